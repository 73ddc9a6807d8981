//! Type Constraint System
//!
//! Type variables are grouped into equivalence classes with a union-find
//! forest. The representative of each class carries the intersection of
//! the constraints of its members and, once known, the concrete type bound
//! to the class.
//!
//! ```text
//!   T0 (integer) ──┐
//!                  ├─ union ─▶ {T0, T1} : integer
//!   T1 (numeric) ──┘
//!
//!   {T0, T1} ── bind i32 ──▶ {T0, T1} = i32
//! ```
//!
//! Because classes only ever merge and a bound type is never replaced, the
//! outcome of a set of unifications does not depend on the order in which
//! they are applied.

use crate::types::{Constraint, Type, TypeVarId};
use arcc_util::{ErrorCode, IndexVec};
use thiserror::Error;
use tracing::debug;

/// Unification failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnifyError {
    /// Two concrete types differ, or a type would contain itself
    #[error("{expected} is not compatible with {found}")]
    Mismatch {
        /// Rendered first type
        expected: String,
        /// Rendered second type
        found: String,
    },
    /// A type does not satisfy a variable's constraint
    #[error("{found} does not satisfy the {constraint} constraint")]
    ConstraintViolation {
        /// The violated constraint
        constraint: Constraint,
        /// Rendered offending type
        found: String,
    },
}

impl UnifyError {
    /// Diagnostic code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            UnifyError::Mismatch { .. } => ErrorCode::TypeMismatch,
            UnifyError::ConstraintViolation { .. } => ErrorCode::TypeConstraintViolation,
        }
    }
}

#[derive(Debug, Clone)]
struct VarData {
    parent: TypeVarId,
    rank: u8,
    constraint: Option<Constraint>,
    bound: Option<Type>,
}

/// Union-find solver over type variables
#[derive(Debug, Clone, Default)]
pub struct ConstraintSystem {
    vars: IndexVec<TypeVarId, VarData>,
}

impl ConstraintSystem {
    /// Create an empty system
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables allocated so far
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// True if no variable was allocated
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Allocate a fresh variable
    pub fn fresh(&mut self, constraint: Option<Constraint>) -> Type {
        let id = self.vars.next_index();
        self.vars.push(VarData {
            parent: id,
            rank: 0,
            constraint,
            bound: None,
        });
        Type::Var(id)
    }

    /// Representative of the class containing `var`
    fn find(&self, mut var: TypeVarId) -> TypeVarId {
        while self.vars[var].parent != var {
            var = self.vars[var].parent;
        }
        var
    }

    /// Constraint currently attached to the class of `var`
    pub fn constraint_of(&self, var: TypeVarId) -> Option<Constraint> {
        self.vars[self.find(var)].constraint
    }

    /// Replace a top-level variable by its binding, or by its representative
    fn shallow(&self, ty: &Type) -> Type {
        match ty {
            Type::Var(v) => {
                let root = self.find(*v);
                match &self.vars[root].bound {
                    Some(bound) => self.shallow(bound),
                    None => Type::Var(root),
                }
            },
            other => other.clone(),
        }
    }

    /// Make `a` and `b` the same type
    pub fn unify(&mut self, a: &Type, b: &Type) -> Result<(), UnifyError> {
        let a = self.shallow(a);
        let b = self.shallow(b);
        match (&a, &b) {
            (Type::Invalid, _) | (_, Type::Invalid) => Ok(()),
            (Type::Var(x), Type::Var(y)) => self.union(*x, *y),
            (Type::Var(x), concrete) | (concrete, Type::Var(x)) => self.bind(*x, concrete),
            (Type::Chan(x), Type::Chan(y)) | (Type::Series(x), Type::Series(y)) => self
                .unify(x, y)
                .map_err(|_| self.mismatch(&a, &b)),
            (Type::Function(f), Type::Function(g)) => {
                let same_shape = f.config.len() == g.config.len()
                    && f.inputs.len() == g.inputs.len()
                    && f.outputs.len() == g.outputs.len();
                if !same_shape {
                    return Err(self.mismatch(&a, &b));
                }
                let pairs: Vec<(Type, Type)> = f
                    .params()
                    .zip(g.params())
                    .map(|(p, q)| (p.ty.clone(), q.ty.clone()))
                    .collect();
                for (p, q) in pairs {
                    self.unify(&p, &q).map_err(|_| self.mismatch(&a, &b))?;
                }
                Ok(())
            },
            (x, y) if x == y => Ok(()),
            _ => Err(self.mismatch(&a, &b)),
        }
    }

    fn mismatch(&self, a: &Type, b: &Type) -> UnifyError {
        UnifyError::Mismatch {
            expected: self.humanize(a),
            found: self.humanize(b),
        }
    }

    /// Bind the unbound class `var` to a non-variable type
    fn bind(&mut self, var: TypeVarId, ty: &Type) -> Result<(), UnifyError> {
        let root = self.find(var);
        if self.occurs(root, ty) {
            return Err(self.mismatch(&Type::Var(root), ty));
        }
        if let Some(constraint) = self.vars[root].constraint {
            if !constraint.admits(ty) {
                return Err(UnifyError::ConstraintViolation {
                    constraint,
                    found: self.humanize(ty),
                });
            }
        }
        self.vars[root].bound = Some(ty.clone());
        Ok(())
    }

    /// True if the class `root` occurs inside `ty`
    fn occurs(&self, root: TypeVarId, ty: &Type) -> bool {
        match self.shallow(ty) {
            Type::Var(v) => v == root,
            Type::Chan(elem) | Type::Series(elem) => self.occurs(root, &elem),
            Type::Function(f) => f.params().any(|p| self.occurs(root, &p.ty)),
            _ => false,
        }
    }

    /// Merge two unbound classes, intersecting their constraints
    fn union(&mut self, x: TypeVarId, y: TypeVarId) -> Result<(), UnifyError> {
        let (x, y) = (self.find(x), self.find(y));
        if x == y {
            return Ok(());
        }
        let merged = match (self.vars[x].constraint, self.vars[y].constraint) {
            (Some(a), Some(b)) => match a.intersect(b) {
                Some(c) => Some(c),
                None => {
                    return Err(UnifyError::ConstraintViolation {
                        constraint: a,
                        found: b.to_string(),
                    })
                },
            },
            (a, b) => a.or(b),
        };

        let (root, child) = if self.vars[x].rank >= self.vars[y].rank {
            (x, y)
        } else {
            (y, x)
        };
        if self.vars[root].rank == self.vars[child].rank {
            self.vars[root].rank += 1;
        }
        self.vars[child].parent = root;
        self.vars[root].constraint = merged;
        Ok(())
    }

    /// Substitute every bound variable, recursively
    pub fn resolve(&self, ty: &Type) -> Type {
        match self.shallow(ty) {
            Type::Chan(elem) => Type::chan(self.resolve(&elem)),
            Type::Series(elem) => Type::series(self.resolve(&elem)),
            Type::Function(mut f) => {
                for p in f.config.iter_mut().chain(&mut f.inputs).chain(&mut f.outputs) {
                    p.ty = self.resolve(&p.ty);
                }
                Type::Function(f)
            },
            other => other,
        }
    }

    /// Bind every unbound constrained class to its default type.
    ///
    /// Returns the number of classes defaulted.
    pub fn finalize(&mut self) -> usize {
        let mut defaulted = 0;
        for var in self.vars.indices().collect::<Vec<_>>() {
            let data = &self.vars[var];
            if data.parent != var || data.bound.is_some() {
                continue;
            }
            if let Some(constraint) = data.constraint {
                self.vars[var].bound = Some(constraint.default_type());
                defaulted += 1;
            }
        }
        debug!(vars = self.vars.len(), defaulted, "finalized constraint system");
        defaulted
    }

    /// Render a type for diagnostics.
    ///
    /// Unbound constrained variables show their constraint name; unbound
    /// unconstrained ones show `unknown`.
    pub fn humanize(&self, ty: &Type) -> String {
        match self.resolve(ty) {
            Type::Var(v) => match self.vars[v].constraint {
                Some(constraint) => constraint.name().to_string(),
                None => "unknown".to_string(),
            },
            Type::Chan(elem) => format!("chan {}", self.humanize(&elem)),
            Type::Series(elem) => format!("series {}", self.humanize(&elem)),
            other => other.to_string(),
        }
    }
}
