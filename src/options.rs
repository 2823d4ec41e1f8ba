//! Configuration for rewrite passes.

/// What to do with a selected member that is not valid UTF-8 in text mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Abort the whole rewrite with [`Error::MemberDecode`].
    ///
    /// [`Error::MemberDecode`]: crate::Error::MemberDecode
    #[default]
    Abort,
    /// Copy the member unchanged and report a warning.
    Skip,
}

/// Options for [`ArchiveRewriter`](crate::ArchiveRewriter) and
/// [`ArchiveEditor`](crate::edit::ArchiveEditor).
///
/// # Example
///
/// ```rust
/// use zipfnr::{DecodePolicy, RewriteOptions};
///
/// let options = RewriteOptions::new()
///     .decode_policy(DecodePolicy::Skip)
///     .keep_existing_backup(true);
/// assert_eq!(options.decode_policy, DecodePolicy::Skip);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Handling of undecodable members in text mode.
    pub decode_policy: DecodePolicy,
    /// Fail with [`Error::BackupExists`](crate::Error::BackupExists) instead
    /// of replacing a backup left by an earlier run.
    pub keep_existing_backup: bool,
    /// Re-read the backup after writing it and compare CRC-32 with the source.
    pub verify_backup: bool,
    /// Copy the source's modification time onto the backup.
    pub preserve_backup_mtime: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            decode_policy: DecodePolicy::Abort,
            keep_existing_backup: false,
            verify_backup: true,
            preserve_backup_mtime: true,
        }
    }
}

impl RewriteOptions {
    /// Creates options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy for undecodable members.
    pub fn decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    /// Refuses to replace an existing backup when set.
    pub fn keep_existing_backup(mut self, keep: bool) -> Self {
        self.keep_existing_backup = keep;
        self
    }

    /// Enables or disables backup verification.
    pub fn verify_backup(mut self, verify: bool) -> Self {
        self.verify_backup = verify;
        self
    }

    /// Enables or disables copying the source mtime onto the backup.
    pub fn preserve_backup_mtime(mut self, preserve: bool) -> Self {
        self.preserve_backup_mtime = preserve;
        self
    }
}
