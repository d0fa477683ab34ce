//! Pose records handed to the rendering side as CSV.

use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::Result;
use crate::optimizer::Frame;
use crate::spine::Spine;

pub const POSE_HEADER: [&str; 9] = [
    "identifier",
    "center_x",
    "center_y",
    "theta",
    "length",
    "p1_x",
    "p1_y",
    "p2_x",
    "p2_y",
];

fn pose_record(spine: &Spine) -> [String; 9] {
    let (center, theta, length) = spine.pose();
    [
        spine.identifier().unwrap_or_default().to_string(),
        center.x.to_string(),
        center.y.to_string(),
        theta.to_string(),
        length.to_string(),
        spine.p1().x.to_string(),
        spine.p1().y.to_string(),
        spine.p2().x.to_string(),
        spine.p2().y.to_string(),
    ]
}

/// One row per spine, in the order given (handle order for graph output).
pub fn write_poses<W: Write>(writer: W, spines: &[Spine]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    writer.write_record(POSE_HEADER)?;
    for spine in spines {
        writer.write_record(&pose_record(spine))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_poses_csv(path: &Path, spines: &[Spine]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_poses(std::io::BufWriter::new(file), spines)
}

/// Every frame's poses in one table, prefixed with an `epoch` column.
pub fn write_frames<W: Write>(writer: W, frames: &[Frame]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    writer.write_record(std::iter::once("epoch").chain(POSE_HEADER))?;
    for frame in frames {
        let epoch = frame.epoch.to_string();
        for spine in &frame.spines {
            let record = pose_record(spine);
            writer.write_record(std::iter::once(epoch.as_str()).chain(record.iter().map(String::as_str)))?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_frames_csv(path: &Path, frames: &[Frame]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_frames(std::io::BufWriter::new(file), frames)
}
