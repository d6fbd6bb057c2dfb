//! Connectivity probe seam
//!
//! Post operations check reachability before issuing a request. The real
//! probe belongs to the hosting platform, so the client only defines the
//! seam and a default that assumes the network is up.

/// Reports whether the platform considers the network reachable
pub trait Connectivity: Send + Sync {
    /// True when a request is worth attempting
    fn is_online(&self) -> bool;
}

/// Default probe: always reports online
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}
