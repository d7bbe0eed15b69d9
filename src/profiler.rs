use std::{
    fs::{create_dir_all, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, OnceLock,
    },
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use crate::mesh::Mesh;

struct ProfilerInner {
    file: Mutex<File>,
    pass_counter: AtomicU64,
}

static PROFILER: OnceLock<Arc<ProfilerInner>> = OnceLock::new();

/// One batch of work (loading, a regeneration sweep, an export) whose
/// sections share a pass number in the CSV.
#[derive(Clone)]
pub struct PassCtx {
    inner: Arc<ProfilerInner>,
    pass_index: u64,
}

pub struct SectionGuard {
    inner: Arc<ProfilerInner>,
    pass_label: String,
    label: String,
    start: Instant,
}

impl Drop for SectionGuard {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        write_line(&self.inner, &self.pass_label, &self.label, None, duration);
    }
}

/// Opens `dir/profile_<timestamp>.csv`. Later calls are no-ops and return
/// `None`.
pub fn init_session(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    if PROFILER.get().is_some() {
        return Ok(None);
    }

    create_dir_all(dir)?;

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs();

    let path = dir.join(format!("profile_{timestamp}.csv"));
    let mut file = File::create(&path)?;
    writeln!(file, "pass,section,points,triangles,duration_ms")?;

    let inner = Arc::new(ProfilerInner {
        file: Mutex::new(file),
        pass_counter: AtomicU64::new(0),
    });

    let _ = PROFILER.set(inner);
    Ok(Some(path))
}

pub fn begin_pass() -> Option<PassCtx> {
    PROFILER.get().map(|inner| PassCtx {
        inner: inner.clone(),
        pass_index: inner.pass_counter.fetch_add(1, Ordering::Relaxed),
    })
}

impl PassCtx {
    pub fn section(&self, label: impl Into<String>) -> SectionGuard {
        SectionGuard {
            inner: self.inner.clone(),
            pass_label: self.pass_index.to_string(),
            label: label.into(),
            start: Instant::now(),
        }
    }

    pub fn scope<F, R>(&self, label: impl Into<String>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let guard = self.section(label);
        let result = f();
        drop(guard);
        result
    }
}

pub fn scope<F, R>(ctx: &Option<PassCtx>, label: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    if let Some(pass) = ctx.as_ref() {
        pass.scope(label, f)
    } else {
        f()
    }
}

/// Times one cable mesh build. The row carries `cable` in the pass column,
/// the cable name as its section, and the control point and triangle
/// counts of the result.
pub fn time_cable<F>(name: &str, points: usize, f: F) -> Mesh
where
    F: FnOnce() -> Mesh,
{
    match PROFILER.get() {
        Some(inner) => {
            let start = Instant::now();
            let mesh = f();
            let size = CableSize {
                points,
                triangles: mesh.total_triangle_count(),
            };
            write_line(inner, "cable", name, Some(size), start.elapsed());
            mesh
        }
        None => f(),
    }
}

#[derive(Debug, Clone, Copy)]
struct CableSize {
    points: usize,
    triangles: usize,
}

fn write_line(
    inner: &ProfilerInner,
    pass_label: &str,
    section: &str,
    size: Option<CableSize>,
    duration: Duration,
) {
    let (points, triangles) = match size {
        Some(size) => (size.points.to_string(), size.triangles.to_string()),
        None => (String::new(), String::new()),
    };
    if let Ok(mut file) = inner.file.lock() {
        let _ = writeln!(
            file,
            "{},{},{},{},{:.6}",
            pass_label,
            section,
            points,
            triangles,
            duration.as_secs_f64() * 1000.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cable_rows_carry_point_and_triangle_counts() {
        let dir = std::env::temp_dir().join(format!("cable_forge_profile_{}", std::process::id()));
        let Some(path) = init_session(&dir).unwrap() else {
            return;
        };
        let pass = begin_pass().unwrap();
        pass.scope("load", || ());
        let mesh = time_cable("profiled", 2, Mesh::new);
        assert!(mesh.is_empty());

        let csv = std::fs::read_to_string(&path).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("pass,section,points,triangles,duration_ms"));
        assert!(csv.lines().any(|line| line.starts_with("cable,profiled,2,0,")));
        assert!(csv.lines().any(|line| line.contains(",load,,,")));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
