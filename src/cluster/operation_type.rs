//! Kinds of long-running operations recorded in the directory.
//!
//! The integer code is what gets persisted in `operations.type`; codes are
//! append-only so existing rows keep their meaning across releases.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::OpsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Unknown,
    ClusterBootstrap,
    ClusterJoin,
    BackupCreate,
    BackupRename,
    BackupRestore,
    BackupRemove,
    ConsoleShow,
    InstanceCreate,
    InstanceUpdate,
    InstanceRename,
    InstanceMigrate,
    InstanceLiveMigrate,
    InstanceFreeze,
    InstanceUnfreeze,
    InstanceDelete,
    InstanceStart,
    InstanceStop,
    InstanceRestart,
    CommandExec,
    SnapshotCreate,
    SnapshotRename,
    SnapshotRestore,
    SnapshotTransfer,
    SnapshotUpdate,
    SnapshotDelete,
    ImageDownload,
    ImageDelete,
    ImageToken,
    ImageRefresh,
    VolumeCopy,
    VolumeCreate,
    VolumeMigrate,
    VolumeMove,
    VolumeSnapshotCreate,
    VolumeSnapshotDelete,
    VolumeSnapshotUpdate,
    ProjectRename,
    ImagesExpire,
    ImagesUpdate,
    ImagesSynchronize,
    LogsExpire,
    BackupsExpire,
    SnapshotsExpire,
    ImageImport,
}

impl OperationType {
    /// Every kind, in code order.
    pub const ALL: [Self; 45] = [
        Self::Unknown,
        Self::ClusterBootstrap,
        Self::ClusterJoin,
        Self::BackupCreate,
        Self::BackupRename,
        Self::BackupRestore,
        Self::BackupRemove,
        Self::ConsoleShow,
        Self::InstanceCreate,
        Self::InstanceUpdate,
        Self::InstanceRename,
        Self::InstanceMigrate,
        Self::InstanceLiveMigrate,
        Self::InstanceFreeze,
        Self::InstanceUnfreeze,
        Self::InstanceDelete,
        Self::InstanceStart,
        Self::InstanceStop,
        Self::InstanceRestart,
        Self::CommandExec,
        Self::SnapshotCreate,
        Self::SnapshotRename,
        Self::SnapshotRestore,
        Self::SnapshotTransfer,
        Self::SnapshotUpdate,
        Self::SnapshotDelete,
        Self::ImageDownload,
        Self::ImageDelete,
        Self::ImageToken,
        Self::ImageRefresh,
        Self::VolumeCopy,
        Self::VolumeCreate,
        Self::VolumeMigrate,
        Self::VolumeMove,
        Self::VolumeSnapshotCreate,
        Self::VolumeSnapshotDelete,
        Self::VolumeSnapshotUpdate,
        Self::ProjectRename,
        Self::ImagesExpire,
        Self::ImagesUpdate,
        Self::ImagesSynchronize,
        Self::LogsExpire,
        Self::BackupsExpire,
        Self::SnapshotsExpire,
        Self::ImageImport,
    ];

    /// Persisted integer code.
    #[must_use]
    pub const fn code(self) -> i64 {
        self as i64
    }

    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Stable snake_case name, used on the command line and in JSON.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::ClusterBootstrap => "cluster_bootstrap",
            Self::ClusterJoin => "cluster_join",
            Self::BackupCreate => "backup_create",
            Self::BackupRename => "backup_rename",
            Self::BackupRestore => "backup_restore",
            Self::BackupRemove => "backup_remove",
            Self::ConsoleShow => "console_show",
            Self::InstanceCreate => "instance_create",
            Self::InstanceUpdate => "instance_update",
            Self::InstanceRename => "instance_rename",
            Self::InstanceMigrate => "instance_migrate",
            Self::InstanceLiveMigrate => "instance_live_migrate",
            Self::InstanceFreeze => "instance_freeze",
            Self::InstanceUnfreeze => "instance_unfreeze",
            Self::InstanceDelete => "instance_delete",
            Self::InstanceStart => "instance_start",
            Self::InstanceStop => "instance_stop",
            Self::InstanceRestart => "instance_restart",
            Self::CommandExec => "command_exec",
            Self::SnapshotCreate => "snapshot_create",
            Self::SnapshotRename => "snapshot_rename",
            Self::SnapshotRestore => "snapshot_restore",
            Self::SnapshotTransfer => "snapshot_transfer",
            Self::SnapshotUpdate => "snapshot_update",
            Self::SnapshotDelete => "snapshot_delete",
            Self::ImageDownload => "image_download",
            Self::ImageDelete => "image_delete",
            Self::ImageToken => "image_token",
            Self::ImageRefresh => "image_refresh",
            Self::VolumeCopy => "volume_copy",
            Self::VolumeCreate => "volume_create",
            Self::VolumeMigrate => "volume_migrate",
            Self::VolumeMove => "volume_move",
            Self::VolumeSnapshotCreate => "volume_snapshot_create",
            Self::VolumeSnapshotDelete => "volume_snapshot_delete",
            Self::VolumeSnapshotUpdate => "volume_snapshot_update",
            Self::ProjectRename => "project_rename",
            Self::ImagesExpire => "images_expire",
            Self::ImagesUpdate => "images_update",
            Self::ImagesSynchronize => "images_synchronize",
            Self::LogsExpire => "logs_expire",
            Self::BackupsExpire => "backups_expire",
            Self::SnapshotsExpire => "snapshots_expire",
            Self::ImageImport => "image_import",
        }
    }

    /// Human description shown to API clients.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown operation",
            Self::ClusterBootstrap => "Creating bootstrap node",
            Self::ClusterJoin => "Joining cluster",
            Self::BackupCreate => "Backing up instance",
            Self::BackupRename => "Renaming instance backup",
            Self::BackupRestore => "Restoring backup",
            Self::BackupRemove => "Removing instance backup",
            Self::ConsoleShow => "Showing console",
            Self::InstanceCreate => "Creating instance",
            Self::InstanceUpdate => "Updating instance",
            Self::InstanceRename => "Renaming instance",
            Self::InstanceMigrate => "Migrating instance",
            Self::InstanceLiveMigrate => "Live-migrating instance",
            Self::InstanceFreeze => "Freezing instance",
            Self::InstanceUnfreeze => "Unfreezing instance",
            Self::InstanceDelete => "Deleting instance",
            Self::InstanceStart => "Starting instance",
            Self::InstanceStop => "Stopping instance",
            Self::InstanceRestart => "Restarting instance",
            Self::CommandExec => "Executing command",
            Self::SnapshotCreate => "Snapshotting instance",
            Self::SnapshotRename => "Renaming snapshot",
            Self::SnapshotRestore => "Restoring snapshot",
            Self::SnapshotTransfer => "Transferring snapshot",
            Self::SnapshotUpdate => "Updating snapshot",
            Self::SnapshotDelete => "Deleting snapshot",
            Self::ImageDownload => "Downloading image",
            Self::ImageDelete => "Deleting image",
            Self::ImageToken => "Image download token",
            Self::ImageRefresh => "Refreshing image",
            Self::VolumeCopy => "Copying storage volume",
            Self::VolumeCreate => "Creating storage volume",
            Self::VolumeMigrate => "Migrating storage volume",
            Self::VolumeMove => "Moving storage volume",
            Self::VolumeSnapshotCreate => "Creating storage volume snapshot",
            Self::VolumeSnapshotDelete => "Deleting storage volume snapshot",
            Self::VolumeSnapshotUpdate => "Updating storage volume snapshot",
            Self::ProjectRename => "Renaming project",
            Self::ImagesExpire => "Cleaning up expired images",
            Self::ImagesUpdate => "Updating images",
            Self::ImagesSynchronize => "Synchronizing images",
            Self::LogsExpire => "Expiring log files",
            Self::BackupsExpire => "Cleaning up expired backups",
            Self::SnapshotsExpire => "Cleaning up expired snapshots",
            Self::ImageImport => "Importing image",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationType {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return Self::from_code(code).ok_or_else(|| {
                OpsError::InvalidArgument(format!("unknown operation type code {code}"))
            });
        }
        let needle = trimmed.to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|op_type| op_type.name() == needle)
            .ok_or_else(|| OpsError::InvalidArgument(format!("unknown operation type '{s}'")))
    }
}

impl ToSql for OperationType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for OperationType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = i64::column_result(value)?;
        Self::from_code(code).ok_or(FromSqlError::OutOfRange(code))
    }
}
