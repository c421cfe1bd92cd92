//! Marker tables for device page parsing
//!
//! Fixed substring tokens found in the device page map to exactly one
//! feature or install method. New markers are rows here, not new code.
//! Detection order follows table order, not document order.

use serde::Serialize;

/// Hazard/capability category for a detected device feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureSeverity {
    Info,
    Warning,
    Critical,
}

/// Install procedure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstallKind {
    Fastboot,
    FastbootAb,
    FastbootVendorBoot,
    FastbootBoot,
    FastbootRecovery,
    Htc,
    Odin,
    Dd,
    FlashImage,
    Mtk,
    RecoveryZip,
}

pub(crate) struct FeatureSpec {
    pub marker: &'static str,
    pub title: &'static str,
    pub detail: &'static str,
    pub severity: FeatureSeverity,
}

pub(crate) const FEATURE_SPECS: &[FeatureSpec] = &[
    FeatureSpec {
        marker: "avb.html",
        title: "AVB Enabled",
        detail: "This device uses Android Verified Boot. Disable verity to boot custom recovery.\nCommand: fastboot --disable-verity --disable-verification flash vbmeta vbmeta.img",
        severity: FeatureSeverity::Warning,
    },
    FeatureSpec {
        marker: "dmverity.html",
        title: "DM-Verity",
        detail: "System modifications prevent booting. Install a kernel with dm-verity disabled or flash a disabler zip immediately.",
        severity: FeatureSeverity::Critical,
    },
    FeatureSpec {
        marker: "dynamicpartitions.html",
        title: "Dynamic Partitions",
        detail: "Uses logical partitions (Super). The recovery cannot modify system/vendor directly. Use fastbootd.",
        severity: FeatureSeverity::Warning,
    },
    FeatureSpec {
        marker: "samsungsystemasroot.html",
        title: "Samsung System-as-Root",
        detail: "A-only. Magisk and recovery share a partition.\nPower + Vol Up = Recovery.\nPower Only = Stock.",
        severity: FeatureSeverity::Critical,
    },
    FeatureSpec {
        marker: "fotakernelnote.html",
        title: "Sony FOTAKernel",
        detail: "Recovery resides in the FOTAKernel partition. Your kernel must support 'extract_elf_ramdisk'.",
        severity: FeatureSeverity::Info,
    },
];

pub(crate) struct InstallSpec {
    pub marker: &'static str,
    pub kind: InstallKind,
    pub title: &'static str,
    pub steps: &'static [&'static str],
    pub note: Option<&'static str>,
}

pub(crate) const INSTALL_SPECS: &[InstallSpec] = &[
    InstallSpec {
        marker: "fastbootinstall.html",
        kind: InstallKind::Fastboot,
        title: "Fastboot Install",
        steps: &[
            "Reboot to Bootloader: adb reboot bootloader",
            "Preferred: fastboot boot recovery.img (then flash the zip in recovery)",
            "Alternative (A-only): fastboot flash recovery recovery.img",
            "Reboot: fastboot reboot (hold Vol Up + Power)",
        ],
        note: Some("Bootloader must be unlocked."),
    },
    InstallSpec {
        marker: "fastbootabinstall.html",
        kind: InstallKind::FastbootAb,
        title: "Fastboot Install (A/B)",
        steps: &[
            "Reboot to Bootloader: adb reboot bootloader",
            "Boot the image: fastboot boot recovery.img",
            "Copy the recovery zip to the device.",
            "Install > Select Zip > Swipe (patches both slots).",
        ],
        note: Some("Do not use 'fastboot flash recovery' on A/B devices."),
    },
    InstallSpec {
        marker: "fastbootinstallrecoveryab.html",
        kind: InstallKind::FastbootRecovery,
        title: "Fastboot (Recovery Partition)",
        steps: &[
            "Reboot to Bootloader: adb reboot bootloader",
            "Flash: fastboot flash recovery recovery.img",
            "Reboot immediately to recovery to prevent overwrite.",
        ],
        note: None,
    },
    InstallSpec {
        marker: "fastbootvendorbootxiaomiabmtk.html",
        kind: InstallKind::FastbootVendorBoot,
        title: "Fastboot (Vendor Boot)",
        steps: &[
            "Reboot to Bootloader: adb reboot bootloader",
            "Flash: fastboot flash vendor_boot recovery.img",
            "Reboot to Recovery: fastboot reboot recovery",
        ],
        note: Some("For Android 12+ GKI devices."),
    },
    InstallSpec {
        marker: "fastbootxiaomiabmtk.html",
        kind: InstallKind::FastbootBoot,
        title: "Fastboot (Boot Partition)",
        steps: &[
            "Reboot to Bootloader: adb reboot bootloader",
            "Flash: fastboot flash boot recovery.img",
            "Reboot to Recovery: fastboot reboot recovery",
        ],
        note: Some("Ensure the device uses 'Recovery in Boot'."),
    },
    InstallSpec {
        marker: "fastbootinstallhtc.html",
        kind: InstallKind::Htc,
        title: "HTC Install",
        steps: &[
            "Reboot to Download Mode: adb reboot download",
            "Flash: fastboot flash recovery recovery.img",
            "Reboot: fastboot reboot",
        ],
        note: None,
    },
    InstallSpec {
        marker: "odininstall.html",
        kind: InstallKind::Odin,
        title: "Odin Install (Samsung)",
        steps: &[
            "Boot to Download Mode.",
            "Open Odin. Click AP/PDA.",
            "Select the .tar.md5 file.",
            "Uncheck 'Auto Reboot'.",
            "Click Start. Force reboot to recovery manually.",
        ],
        note: None,
    },
    InstallSpec {
        marker: "ddinstall.html",
        kind: InstallKind::Dd,
        title: "DD Install (Root)",
        steps: &[
            "Requires root. Place recovery.img in /sdcard/",
            "Terminal: su",
            "Command: dd if=/sdcard/recovery.img of=/dev/block/bootdevice/by-name/recovery",
        ],
        note: None,
    },
    InstallSpec {
        marker: "flashimageinstall.html",
        kind: InstallKind::FlashImage,
        title: "Flash Image (Root)",
        steps: &[
            "Requires root. Place recovery.img in /sdcard/",
            "Terminal: su",
            "Command: flash_image recovery /sdcard/recovery.img",
        ],
        note: None,
    },
    InstallSpec {
        marker: "mtkinstall.html",
        kind: InstallKind::Mtk,
        title: "SP Flash Tool",
        steps: &[
            "Open SP Flash Tool.",
            "Load the scatter file.",
            "Uncheck all except RECOVERY.",
            "Select recovery.img.",
            "Click Download, then connect the powered-off device.",
        ],
        note: None,
    },
];

/// Default method: installing the zip from an existing custom recovery.
/// Appended when its marker is present or when nothing else matched.
pub(crate) const RECOVERY_ZIP_SPEC: InstallSpec = InstallSpec {
    marker: "pbrpinstall.html",
    kind: InstallKind::RecoveryZip,
    title: "Recovery Install (Zip)",
    steps: &[
        "Download the latest recovery zip.",
        "Boot into the current custom recovery.",
        "Install > Select Zip > Swipe.",
        "Reboot to Recovery.",
    ],
    note: None,
};
