/// Lifecycle tier of a tracked object.
///
/// Promotion is one-way: a confirmed object is never demoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tier {
    /// Admitted, not yet sustained past the promotion dwell
    #[default]
    Provisional,
    /// Sustained presence; counted when it ends
    Confirmed,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provisional => "provisional",
            Self::Confirmed => "confirmed",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
