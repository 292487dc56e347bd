//! 轴对齐
//!
//! Rotates each sensor frame into the shared body frame: y forward
//! (anteroposterior), z vertical. The transform depends only on where the
//! sensor is worn; accelerometer and gyroscope share it.

use contracts::{Location, Sample, Stream, Vector3};
use nalgebra::{Matrix3, Vector3 as Vec3};

/// Sensor-to-body rotation for `location`.
pub fn body_frame(location: Location) -> Matrix3<f64> {
    match location {
        // x' = -z, y' = y, z' = -x
        Location::LeftAnkle => Matrix3::new(
            0.0, 0.0, -1.0, //
            0.0, 1.0, 0.0, //
            -1.0, 0.0, 0.0,
        ),
        // x' = z, y' = y, z' = x
        Location::RightAnkle => Matrix3::new(
            0.0, 0.0, 1.0, //
            0.0, 1.0, 0.0, //
            1.0, 0.0, 0.0,
        ),
        // x' = -y, y' = -x, z' = -z
        Location::Pelvis => Matrix3::new(
            0.0, -1.0, 0.0, //
            -1.0, 0.0, 0.0, //
            0.0, 0.0, -1.0,
        ),
    }
}

/// Returns `stream` expressed in the body frame.
pub fn align(stream: &Stream) -> Stream {
    let rotation = body_frame(stream.channel().location);
    stream.map_samples(|sample| {
        let v = sample.values;
        let rotated = rotation * Vec3::new(v.x, v.y, v.z);
        Sample {
            timestamp: sample.timestamp,
            values: Vector3::new(rotated.x, rotated.y, rotated.z),
        }
    })
}
