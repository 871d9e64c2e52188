//! Report header source.

/// Supplies the date/time banner prepended verbatim to every report
pub trait HeaderSource: Send + Sync {
    fn current_header(&self) -> String;
}

/// Constant header, for tests and deployments without a clock banner
#[derive(Clone, Debug, Default)]
pub struct FixedHeader(pub String);

impl HeaderSource for FixedHeader {
    fn current_header(&self) -> String {
        self.0.clone()
    }
}
