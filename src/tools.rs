//! Privileged command catalog
//!
//! Plain command strings handed off to a root-shell collaborator; this
//! crate never executes them.

/// A labeled root-shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolCommand {
    pub label: &'static str,
    pub command: &'static str,
}

/// Power-menu commands offered once root access is confirmed.
pub const POWER_COMMANDS: &[ToolCommand] = &[
    ToolCommand {
        label: "Reboot system",
        command: "reboot",
    },
    ToolCommand {
        label: "Reboot to recovery",
        command: "reboot recovery",
    },
    ToolCommand {
        label: "Reboot to bootloader",
        command: "reboot bootloader",
    },
];
