//! Worker-count selection for the row-parallel integrator.

/// Parallelism configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelismProfile {
    pub worker_count: usize,
}

impl ParallelismProfile {
    pub fn single_threaded() -> Self {
        Self { worker_count: 1 }
    }

    /// One worker per core.
    pub fn dynamic() -> Self {
        Self {
            worker_count: num_cpus::get().max(1),
        }
    }

    /// `requested == 0` means one per core. Never more workers than rows,
    /// since a band is at least one row.
    pub fn for_rows(requested: usize, rows: usize) -> Self {
        let base = if requested == 0 {
            Self::dynamic().worker_count
        } else {
            requested
        };
        Self {
            worker_count: base.min(rows).max(1),
        }
    }

    /// Row bands `[start, end)` covering `0..rows`, as even as possible.
    pub fn row_bands(&self, rows: usize) -> Vec<(usize, usize)> {
        let workers = self.worker_count.min(rows).max(1);
        let base = rows / workers;
        let extra = rows % workers;

        let mut bands = Vec::with_capacity(workers);
        let mut start = 0;
        for w in 0..workers {
            let len = base + usize::from(w < extra);
            bands.push((start, start + len));
            start += len;
        }
        bands
    }
}
