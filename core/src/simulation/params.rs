//! `key=value;key=value` model parameter strings.

use std::collections::HashMap;
use std::fmt;

use crate::simulation::SimulationError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: HashMap<String, f64>,
}

impl Parameters {
    /// Parse `alpha=1;beta=2`. Empty pieces (`a=1;;b=2`, trailing `;`) are
    /// skipped; anything that is not exactly `name=number` is rejected.
    pub fn parse(params: &str) -> Result<Self, SimulationError> {
        let mut values = HashMap::new();

        for piece in params.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let mut vars = piece.split('=').map(str::trim).filter(|v| !v.is_empty());
            let (Some(name), Some(raw), None) = (vars.next(), vars.next(), vars.next()) else {
                return Err(SimulationError::InvalidParameters {
                    params: params.to_string(),
                    reason: format!("`{piece}` is not a name=value pair"),
                });
            };
            let value: f64 = raw.parse().map_err(|_| SimulationError::InvalidParameters {
                params: params.to_string(),
                reason: format!("`{raw}` is not a number"),
            })?;
            values.insert(name.to_string(), value);
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn require(&self, name: &'static str) -> Result<f64, SimulationError> {
        self.get(name)
            .ok_or(SimulationError::MissingParameter { name })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.values.keys().collect();
        names.sort();
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}={}", name, self.values[name])?;
        }
        Ok(())
    }
}
