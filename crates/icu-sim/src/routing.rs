//! `SpecialtyIndex`: specialty → department resolution.
//!
//! Built once from the department specialty lists.  A specialty claimed by
//! two departments is a configuration error; a specialty claimed by none
//! resolves to `None`, which the front desk treats like a full department.

use std::collections::HashMap;

use icu_core::{DepartmentId, IcuError, IcuResult, Specialty};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpecialtyIndex {
    routes: HashMap<Specialty, DepartmentId>,
}

impl SpecialtyIndex {
    /// `departments[i]` lists the specialties served by `DepartmentId(i)`.
    pub fn build(departments: &[Vec<Specialty>]) -> IcuResult<Self> {
        let mut routes = HashMap::new();
        for (i, specialties) in departments.iter().enumerate() {
            let id = DepartmentId(u16::try_from(i).map_err(|_| {
                IcuError::Config(format!("too many departments ({})", departments.len()))
            })?);
            for &spec in specialties {
                match routes.insert(spec, id) {
                    Some(previous) if previous != id => {
                        return Err(IcuError::Config(format!(
                            "specialty {spec} is claimed by {previous} and {id}"
                        )));
                    }
                    _ => {}
                }
            }
        }
        Ok(Self { routes })
    }

    #[inline]
    pub fn resolve(&self, specialty: Specialty) -> Option<DepartmentId> {
        self.routes.get(&specialty).copied()
    }

    /// Specialties no department serves.
    pub fn unrouted(&self) -> Vec<Specialty> {
        Specialty::ALL.into_iter().filter(|s| !self.routes.contains_key(s)).collect()
    }
}
