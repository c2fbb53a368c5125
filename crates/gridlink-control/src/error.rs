//! Error taxonomy for the control layer.
//!
//! Exactly two failure classes surface here: the controller has no
//! registered client (a registry lifecycle problem the reconciler must
//! resolve, never retried here), and a remote call failed (propagated
//! verbatim). Tolerable absence never reaches this type — operations map
//! it to zero/false/empty results before returning.

use thiserror::Error;

use gridlink_hostlist::HostlistError;
use gridlink_remote::RemoteError;

use crate::names::ObjectKey;

pub type ControlResult<T> = Result<T, ControlError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    /// No remote client is registered for the workload's controller.
    #[error("no remote client registered for controller {0}")]
    ClientNotRegistered(ObjectKey),

    /// A remote scheduler call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A job record carried a hostlist expression we could not expand.
    #[error("bad job hostlist: {0}")]
    Hostlist(#[from] HostlistError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_registered_names_the_controller() {
        let err = ControlError::ClientNotRegistered(ObjectKey::new("hpc", "cluster-a"));
        assert_eq!(
            err.to_string(),
            "no remote client registered for controller hpc/cluster-a"
        );
    }

    #[test]
    fn remote_errors_convert_transparently() {
        let err: ControlError = RemoteError::NoContent.into();
        assert_eq!(err, ControlError::Remote(RemoteError::NoContent));
        assert_eq!(err.to_string(), RemoteError::NoContent.to_string());
    }
}
