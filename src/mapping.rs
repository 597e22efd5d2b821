//! Mapping tablets onto a screen region.
//!
//! Calibration matrices work in normalized coordinates: `(0, 0)` is the top-left corner of the
//! area the driver maps the device onto (normally the whole screen), and `(1, 1)` is the
//! bottom-right corner. Confining a tablet to part of the screen therefore means scaling the unit
//! square down to the region's size, then moving it to the region's offset.
//!
//! ```
//! use tabmap::{Mapping, Rectangle, TransformationMatrix};
//!
//! // Two 1920×1080 monitors side by side; map the tablet onto the left one.
//! let mapping = Mapping::to_region(Rectangle::new(0, 0, 1920, 1080))
//!     .with_bounds(Rectangle::new(0, 0, 3840, 1080));
//! assert_eq!(mapping.matrix()?, TransformationMatrix::scale(0.5, 1.0));
//! # Ok::<(), std::io::Error>(())
//! ```

use std::{io, time::Instant};

use crate::{
    calibration::{
        CalibrationDevice, CalibrationOutcome, DeviceCapability, read_matrix, write_matrix,
    },
    matrix::TransformationMatrix,
    screen::{Rectangle, Screen, bounding_box},
};

/// Describes which devices to calibrate, and onto which part of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    region: Rectangle,
    bounds: Rectangle,
    capability: DeviceCapability,
}

impl Mapping {
    /// Creates a [`Mapping`] onto `region`.
    ///
    /// Until [`Mapping::with_bounds`] is called, the region is assumed to be the whole screen,
    /// which results in the identity matrix. Only devices with
    /// [`DeviceCapability::TABLET_TOOL`] are affected by default.
    pub fn to_region(region: Rectangle) -> Self {
        Self {
            region,
            bounds: region,
            capability: DeviceCapability::TABLET_TOOL,
        }
    }

    /// Creates a [`Mapping`] onto `region`, using the combined area of the monitors on `screen`
    /// as the bounds.
    ///
    /// Fails if `screen` reports no monitors with a non-zero size.
    pub fn on_screen<S: Screen + ?Sized>(screen: &S, region: Rectangle) -> io::Result<Self> {
        let monitors = screen.monitors()?;
        let Some(bounds) = bounding_box(&monitors) else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "display server reports no monitors",
            ));
        };
        log::debug!("{} monitors spanning {bounds}", monitors.len());
        Ok(Self::to_region(region).with_bounds(bounds))
    }

    /// Sets the area the driver maps the device onto without calibration.
    pub fn with_bounds(mut self, bounds: Rectangle) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the capability a device needs in order to be calibrated.
    pub fn with_capability(mut self, capability: DeviceCapability) -> Self {
        self.capability = capability;
        self
    }

    #[inline]
    pub fn region(&self) -> Rectangle {
        self.region
    }

    #[inline]
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    #[inline]
    pub fn capability(&self) -> DeviceCapability {
        self.capability
    }

    /// Computes the calibration matrix that confines a device to the region.
    ///
    /// # Errors
    ///
    /// Returns an [`io::ErrorKind::InvalidInput`] error if the region or the bounds are empty.
    pub fn matrix(&self) -> io::Result<TransformationMatrix> {
        let (r, b) = (self.region, self.bounds);
        if b.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot map onto empty screen area {b}"),
            ));
        }
        if r.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot map onto empty region {r}"),
            ));
        }

        let [bw, bh] = [f64::from(b.width()), f64::from(b.height())];
        let tx = (f64::from(r.x()) - f64::from(b.x())) / bw;
        let ty = (f64::from(r.y()) - f64::from(b.y())) / bh;
        let sx = f64::from(r.width()) / bw;
        let sy = f64::from(r.height()) / bh;

        Ok(TransformationMatrix::translate(tx as f32, ty as f32)
            * TransformationMatrix::scale(sx as f32, sy as f32))
    }

    /// Writes the calibration matrix to every device in `devices` that has the configured
    /// capability.
    ///
    /// Returns one entry per calibrated device. Failing to talk to one device does not prevent
    /// the others from being calibrated; its entry holds the error instead.
    pub fn apply<I>(&self, devices: I) -> io::Result<Vec<io::Result<MappingReport>>>
    where
        I: IntoIterator,
        I::Item: CalibrationDevice,
    {
        let now = Instant::now();
        let matrix = self.matrix()?;

        let mut reports = Vec::new();
        for mut device in devices {
            if !device.has_capability(self.capability) {
                continue;
            }

            let report = calibrate(&mut device, &matrix);
            match &report {
                Ok(r) if r.outcome.is_success() => {
                    log::debug!("mapped '{}' to {} ({matrix})", r.name, self.region);
                }
                Ok(r) => log::warn!("could not calibrate '{}': {}", r.name, r.outcome),
                Err(e) => log::warn!("could not calibrate device: {e}"),
            }
            reports.push(report);
        }

        log::trace!(
            "`Mapping::apply` calibrated {} devices in {:?}",
            reports.len(),
            now.elapsed()
        );
        Ok(reports)
    }
}

fn calibrate<D: CalibrationDevice>(
    device: &mut D,
    matrix: &TransformationMatrix,
) -> io::Result<MappingReport> {
    let name = device.name()?;
    let previous = read_matrix(&*device)?;
    let outcome = write_matrix(device, matrix)?;
    Ok(MappingReport {
        name,
        previous,
        outcome,
    })
}

/// What happened to one device in [`Mapping::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct MappingReport {
    name: String,
    previous: Option<TransformationMatrix>,
    outcome: CalibrationOutcome,
}

impl MappingReport {
    /// Returns the device name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the calibration matrix the device had before, if any.
    #[inline]
    pub fn previous(&self) -> Option<TransformationMatrix> {
        self.previous
    }

    /// Returns how the driver responded to the new matrix.
    #[inline]
    pub fn outcome(&self) -> CalibrationOutcome {
        self.outcome
    }
}
