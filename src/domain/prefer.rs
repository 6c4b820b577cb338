/// Value of the PostgREST `Prefer` request header.
///
/// Controls whether an insert echoes the stored row back in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefer {
    ReturnRepresentation,
    ReturnMinimal,
}

impl Prefer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefer::ReturnRepresentation => "return=representation",
            Prefer::ReturnMinimal => "return=minimal",
        }
    }
}

impl std::fmt::Display for Prefer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
