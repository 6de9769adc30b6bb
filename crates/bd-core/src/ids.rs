use core::fmt;
use core::str::FromStr;

use crate::CoreError;

const ID_LEN: usize = 8;

/// Opaque identifier for one simulation environment.
///
/// Eight uppercase hexadecimal characters, drawn from a random UUID.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvironmentId(String);

impl EnvironmentId {
    /// Draw a fresh random id.
    pub fn random() -> Self {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        Self(raw[..ID_LEN].to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EnvironmentId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ID_LEN || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidArg {
                what: "environment id must be 8 hexadecimal characters",
            });
        }
        Ok(Self(s.to_ascii_uppercase()))
    }
}

impl fmt::Debug for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnvironmentId({})", self.0)
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_id_shape() {
        let id = EnvironmentId::random();
        assert_eq!(id.as_str().len(), 8);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn random_ids_differ() {
        let a = EnvironmentId::random();
        let b = EnvironmentId::random();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_normalizes_case() {
        let id: EnvironmentId = "deadbeef".parse().unwrap();
        assert_eq!(id.to_string(), "DEADBEEF");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!("XYZ".parse::<EnvironmentId>().is_err());
        assert!("0123456789".parse::<EnvironmentId>().is_err());
        assert!("0123456G".parse::<EnvironmentId>().is_err());
    }
}
