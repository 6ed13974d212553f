use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::dynamics::Trajectory;

/// Write the first `n` samples of a trajectory as CSV.
///
/// Columns: time, x, y, z, vx, vy, vz
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &Trajectory, n: usize) -> io::Result<()> {
    writeln!(writer, "time,x,y,z,vx,vy,vz")?;

    for (t, s) in trajectory.iter().take(n) {
        writeln!(
            writer,
            "{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            t,
            s.pos.x, s.pos.y, s.pos.z,
            s.vel.x, s.vel.y, s.vel.z,
        )?;
    }

    Ok(())
}

/// Write trajectory samples to a CSV file at the given path.
pub fn write_trajectory_file(path: impl AsRef<Path>, trajectory: &Trajectory, n: usize) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_trajectory(&mut file, trajectory, n)?;
    file.flush()
}
