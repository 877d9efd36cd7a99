//! Core traits for hydraulic links.

/// A link whose flow is a function of the head difference across it.
///
/// `flow_from_head` and `head_loss` are approximate inverses of each other.
/// Positive flow means `from -> to`.
pub trait HydraulicLink {
    /// Label for logs.
    fn label(&self) -> String;

    /// Steady flow driven by a head difference (m³/s).
    fn flow_from_head(&self, dh: f64) -> f64;

    /// Head lost when carrying `flow` (m). Always non-negative.
    fn head_loss(&self, flow: f64) -> f64;
}
