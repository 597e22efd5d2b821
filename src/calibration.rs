//! Reading and writing a device's calibration matrix.
//!
//! The input driver owns the calibration matrix of each device. This module talks to it through
//! the [`CalibrationDevice`] trait, which is implemented by the input-device binding, and turns
//! the driver's raw status codes into a [`CalibrationOutcome`].

use std::{error::Error, fmt, io, str::FromStr};

use crate::matrix::TransformationMatrix;

ffi_enum! {
    /// A capability an input device can advertise (`LIBINPUT_DEVICE_CAP_*`).
    ///
    /// Parsing a [`DeviceCapability`] from a string accepts the constant names, like
    /// `"TABLET_TOOL"`.
    pub enum DeviceCapability: u32 {
        KEYBOARD    = 0,
        POINTER     = 1,
        TOUCH       = 2,
        /// The device reports pen or tablet-style tool events.
        TABLET_TOOL = 3,
        /// The device is the button/ring/strip pad of a tablet.
        TABLET_PAD  = 4,
        GESTURE     = 5,
        SWITCH      = 6,
    }
}

impl fmt::Debug for DeviceCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant_name() {
            Some(name) => write!(f, "CAP_{name}"),
            None => write!(f, "DeviceCapability({})", self.0),
        }
    }
}

impl FromStr for DeviceCapability {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_variant_name(s).ok_or(UnknownVariant { _p: () })
    }
}

/// Error returned when parsing an unknown [`DeviceCapability`] name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    _p: (),
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown variant name")
    }
}
impl Error for UnknownVariant {}
impl From<UnknownVariant> for io::Error {
    fn from(value: UnknownVariant) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, value)
    }
}

ffi_enum! {
    /// A raw configuration status code, as returned by the driver (`LIBINPUT_CONFIG_STATUS_*`).
    ///
    /// Drivers may return codes that have no named constant here; [`CalibrationOutcome`]
    /// preserves them as [`CalibrationOutcome::Unknown`].
    pub enum ConfigStatus: u32 {
        SUCCESS     = 0,
        UNSUPPORTED = 1,
        INVALID     = 2,
    }
}

impl fmt::Debug for ConfigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant_name() {
            Some(name) => write!(f, "CONFIG_STATUS_{name}"),
            None => write!(f, "ConfigStatus({})", self.0),
        }
    }
}

/// The result of writing a calibration matrix to a device.
///
/// [`CalibrationOutcome::Unsupported`] and [`CalibrationOutcome::Invalid`] are regular results,
/// not errors: the device was reached, but did not take the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum CalibrationOutcome {
    /// The matrix was applied.
    Success,
    /// The device or its driver does not support calibration.
    Unsupported,
    /// The driver rejected the matrix.
    Invalid,
    /// The driver returned a status code this crate does not know.
    Unknown(ConfigStatus),
}

impl CalibrationOutcome {
    /// Returns whether the matrix was applied.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<ConfigStatus> for CalibrationOutcome {
    fn from(status: ConfigStatus) -> Self {
        match status {
            ConfigStatus::SUCCESS => Self::Success,
            ConfigStatus::UNSUPPORTED => Self::Unsupported,
            ConfigStatus::INVALID => Self::Invalid,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for CalibrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Unsupported => f.write_str("calibration is not supported by the device"),
            Self::Invalid => f.write_str("the calibration matrix was rejected as invalid"),
            Self::Unknown(status) => write!(f, "unknown configuration status {}", status.0),
        }
    }
}

/// An input device whose coordinates the driver can calibrate.
///
/// Methods block until the driver has answered. A single device must not be used from several
/// threads at once, which writes enforce by taking `&mut self`.
pub trait CalibrationDevice {
    /// Returns the human-readable device name.
    fn name(&self) -> io::Result<String>;

    /// Returns whether the device advertises `capability`.
    fn has_capability(&self, capability: DeviceCapability) -> bool;

    /// Returns whether the device currently has a calibration matrix.
    fn has_calibration_matrix(&self) -> io::Result<bool>;

    /// Returns the current calibration matrix coefficients, in row-major order.
    ///
    /// Only called after [`CalibrationDevice::has_calibration_matrix`] returned `true`.
    fn calibration_matrix(&self) -> io::Result<[f32; 6]>;

    /// Asks the driver to apply `matrix` and returns its status code.
    ///
    /// An `Err` means the device could not be reached at all. A refusal from the driver is
    /// reported through the returned [`ConfigStatus`].
    fn set_calibration_matrix(&mut self, matrix: &[f32; 6]) -> io::Result<ConfigStatus>;
}

impl<D: CalibrationDevice + ?Sized> CalibrationDevice for &mut D {
    fn name(&self) -> io::Result<String> {
        (**self).name()
    }

    fn has_capability(&self, capability: DeviceCapability) -> bool {
        (**self).has_capability(capability)
    }

    fn has_calibration_matrix(&self) -> io::Result<bool> {
        (**self).has_calibration_matrix()
    }

    fn calibration_matrix(&self) -> io::Result<[f32; 6]> {
        (**self).calibration_matrix()
    }

    fn set_calibration_matrix(&mut self, matrix: &[f32; 6]) -> io::Result<ConfigStatus> {
        (**self).set_calibration_matrix(matrix)
    }
}

/// Reads the calibration matrix currently configured on `device`.
///
/// Returns `Ok(None)` if the device has no matrix configured.
pub fn read_matrix<D: CalibrationDevice + ?Sized>(
    device: &D,
) -> io::Result<Option<TransformationMatrix>> {
    if !device.has_calibration_matrix()? {
        log::debug!("device has no calibration matrix");
        return Ok(None);
    }

    let matrix = TransformationMatrix::from_array(device.calibration_matrix()?);
    log::debug!("read calibration matrix {matrix}");
    Ok(Some(matrix))
}

/// Writes `matrix` to `device` and reports how the driver responded.
pub fn write_matrix<D: CalibrationDevice + ?Sized>(
    device: &mut D,
    matrix: &TransformationMatrix,
) -> io::Result<CalibrationOutcome> {
    let status = device.set_calibration_matrix(matrix.as_array())?;
    let outcome = CalibrationOutcome::from(status);
    match outcome {
        CalibrationOutcome::Success => log::debug!("applied calibration matrix {matrix}"),
        CalibrationOutcome::Unsupported | CalibrationOutcome::Invalid => {
            log::debug!("calibration matrix {matrix} not applied: {outcome}");
        }
        CalibrationOutcome::Unknown(status) => {
            log::warn!("driver returned unknown status {status:?} for calibration matrix {matrix}");
        }
    }
    Ok(outcome)
}
