//! Requestor identities competing for the transaction channel.

use serde::{Deserialize, Serialize};

/// Origin of a transaction request.
///
/// Two values are sentinels rather than real request sources:
/// - [`Requestor::None`] marks a free channel and is never admitted as a holder.
/// - [`Requestor::ExecPending`] authorises forced termination regardless of
///   the current holder. It is used by the watchdog and recovery paths and is
///   never admitted as a holder either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Requestor {
    /// No holder.
    #[default]
    None,
    /// Synthetic recovery identity.
    ExecPending,
    /// Remote tag or reader activated over RF.
    NfaActivated,
    /// Secure-element action notification.
    EeAction,
    /// Card-emulation activation.
    CeActivated,
    /// RF field appeared or vanished.
    RfFieldChange,
    /// Start polling/listening.
    EnableDiscovery,
    /// Stop polling/listening.
    DisableDiscovery,
    /// Commit of the listen-mode routing table.
    SetRouting,
    /// APDU exchange with a secure element.
    SeTransceive,
    /// Open a secure-element logical channel.
    SeOpenChannel,
    /// Close a secure-element logical channel.
    SeCloseChannel,
    /// Secure-element reset.
    SeReset,
    /// Controller power mode or screen state change.
    PowerModeChange,
    /// Reader mode enable/disable.
    ReaderModeToggle,
    /// Stack shutdown.
    Shutdown,
}

impl Requestor {
    /// Whether this requestor can stall the channel indefinitely.
    ///
    /// The watchdog is armed only for these identities.
    #[must_use]
    pub const fn is_livelock_prone(self) -> bool {
        matches!(
            self,
            Self::NfaActivated | Self::EeAction | Self::CeActivated | Self::RfFieldChange
        )
    }

    /// Whether this is [`Requestor::None`] or [`Requestor::ExecPending`].
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        matches!(self, Self::None | Self::ExecPending)
    }

    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ExecPending => "exec-pending",
            Self::NfaActivated => "nfa-activated",
            Self::EeAction => "ee-action",
            Self::CeActivated => "ce-activated",
            Self::RfFieldChange => "rf-field-change",
            Self::EnableDiscovery => "enable-discovery",
            Self::DisableDiscovery => "disable-discovery",
            Self::SetRouting => "set-routing",
            Self::SeTransceive => "se-transceive",
            Self::SeOpenChannel => "se-open-channel",
            Self::SeCloseChannel => "se-close-channel",
            Self::SeReset => "se-reset",
            Self::PowerModeChange => "power-mode-change",
            Self::ReaderModeToggle => "reader-mode-toggle",
            Self::Shutdown => "shutdown",
        }
    }

    /// All identities, sentinels included.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::None,
            Self::ExecPending,
            Self::NfaActivated,
            Self::EeAction,
            Self::CeActivated,
            Self::RfFieldChange,
            Self::EnableDiscovery,
            Self::DisableDiscovery,
            Self::SetRouting,
            Self::SeTransceive,
            Self::SeOpenChannel,
            Self::SeCloseChannel,
            Self::SeReset,
            Self::PowerModeChange,
            Self::ReaderModeToggle,
            Self::Shutdown,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for Requestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_livelock_prone_set() {
        let prone: Vec<Requestor> = Requestor::all()
            .filter(|r| r.is_livelock_prone())
            .collect();
        assert_eq!(
            prone,
            vec![
                Requestor::NfaActivated,
                Requestor::EeAction,
                Requestor::CeActivated,
                Requestor::RfFieldChange,
            ]
        );
    }

    #[test]
    fn test_sentinels_are_not_livelock_prone() {
        assert!(Requestor::None.is_sentinel());
        assert!(Requestor::ExecPending.is_sentinel());
        assert!(!Requestor::None.is_livelock_prone());
        assert!(!Requestor::ExecPending.is_livelock_prone());
        assert!(!Requestor::SetRouting.is_sentinel());
    }

    #[test]
    fn test_default_is_none() {
        assert_eq!(Requestor::default(), Requestor::None);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = Requestor::all().map(Requestor::as_str).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(Requestor::RfFieldChange.to_string(), "rf-field-change");
    }
}
