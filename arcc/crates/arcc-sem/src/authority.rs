//! Authority declarations
//!
//! Authority blocks assign a priority byte to the whole program or to
//! individual channels. They must come first: the pass is a one-way state
//! machine that leaves [`Placement::BeforeOtherDeclarations`] on the first
//! item that is not an authority block.

use crate::context::Context;
use crate::scope::SymbolKind;
use arcc_par::{AuthorityBlock, AuthorityEntry, AuthorityKind, Item, Program};
use arcc_util::{ErrorCode, Span};
use indexmap::IndexMap;
use tracing::trace;

/// Authorities declared by a program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authorities {
    /// Program-wide default
    pub default: Option<u8>,
    /// Authority per channel id
    pub channels: IndexMap<u32, u8>,
    /// Channel name per channel id
    pub keys: IndexMap<u32, String>,
}

impl Authorities {
    /// Authority of a channel, falling back to the default
    pub fn for_channel(&self, id: u32) -> Option<u8> {
        self.channels.get(&id).copied().or(self.default)
    }
}

/// Where the walk is relative to the first non-authority item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Only authority blocks seen so far
    BeforeOtherDeclarations,
    /// A func, flow or sequence was seen
    SeenOtherDeclaration,
}

/// Validate every authority block of `ctx.ast`
pub fn analyze_authorities(ctx: &Context<'_, Program>) -> Authorities {
    let mut authorities = Authorities::default();
    let mut placement = Placement::BeforeOtherDeclarations;

    for item in &ctx.ast.items {
        let Item::Authority(block) = item else {
            placement = Placement::SeenOtherDeclaration;
            continue;
        };
        let ctx = ctx.child(block);
        if placement == Placement::SeenOtherDeclaration {
            ctx.error("authority blocks must appear before any func, flow, or sequence declarations");
            continue;
        }
        analyze_block(&ctx, &mut authorities);
    }

    trace!(
        default = ?authorities.default,
        channels = authorities.channels.len(),
        "analyzed authorities"
    );
    authorities
}

fn analyze_block(ctx: &Context<'_, AuthorityBlock>, authorities: &mut Authorities) {
    match &ctx.ast.kind {
        AuthorityKind::Simple { value, value_span } => {
            set_default(ctx, authorities, *value, *value_span);
        },
        AuthorityKind::Grouped(entries) => {
            for entry in entries {
                analyze_entry(&ctx.child(entry), authorities);
            }
        },
    }
}

fn checked_value<N: ?Sized>(ctx: &Context<'_, N>, value: u64, span: Span) -> Option<u8> {
    match u8::try_from(value) {
        Ok(value) => Some(value),
        Err(_) => {
            ctx.error_at(&span, format!("authority value {value} is out of range (0-255)"));
            None
        },
    }
}

fn set_default<N: ?Sized>(
    ctx: &Context<'_, N>,
    authorities: &mut Authorities,
    value: u64,
    span: Span,
) {
    let Some(value) = checked_value(ctx, value, span) else {
        return;
    };
    if authorities.default.is_some() {
        ctx.error_at(&span, "multiple default authority values");
        return;
    }
    authorities.default = Some(value);
}

fn analyze_entry(ctx: &Context<'_, AuthorityEntry>, authorities: &mut Authorities) {
    let entry = ctx.ast;
    let Some(channel) = &entry.channel else {
        set_default(ctx, authorities, entry.value, entry.value_span);
        return;
    };
    let symbol = match ctx.scope.resolve(&channel.name) {
        Ok(symbol) => symbol,
        Err(_) => {
            ctx.error_code_at(
                ErrorCode::SymbolUndefined,
                channel,
                format!("channel {} not found", channel.name),
            );
            return;
        },
    };
    if symbol.kind != SymbolKind::Channel {
        ctx.error_at(channel, format!("{} is not a channel", channel.name));
        return;
    }
    if authorities.channels.contains_key(&symbol.id) {
        ctx.error_at(channel, format!("duplicate authority for channel {}", channel.name));
        return;
    }
    let Some(value) = checked_value(ctx, entry.value, entry.value_span) else {
        return;
    };
    authorities.channels.insert(symbol.id, value);
    authorities.keys.insert(symbol.id, channel.name.clone());
}
