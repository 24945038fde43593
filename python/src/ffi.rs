//! Python-facing functions and classes.
//!
//! Errors cross the boundary as `TruncatedStreamError` (an `IOError`),
//! `ShapeError` (a `ValueError`), `IOError` or `ValueError`.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use pyo3::create_exception;
use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use rdframes_core::config::{DecoderConfig, SimulationConfig};
use rdframes_core::headers::Header;
use rdframes_core::logging;
use rdframes_core::simulation::simulate_to_file;
use rdframes_core::stream::{open_file, FrameDecoder};
use rdframes_core::types::StreamError;

create_exception!(rdframes, TruncatedStreamError, PyIOError);
create_exception!(rdframes, ShapeError, PyValueError);

type Rows = Vec<Vec<f64>>;

fn to_py_err(err: StreamError) -> PyErr {
    if err.is_truncated() {
        TruncatedStreamError::new_err(err.to_string())
    } else if err.is_shape() {
        ShapeError::new_err(err.to_string())
    } else if matches!(err, StreamError::Io(_)) {
        PyIOError::new_err(err.to_string())
    } else {
        PyValueError::new_err(err.to_string())
    }
}

fn header_tuple(h: &Header) -> (i32, i32, i32) {
    (h.width, h.height, h.steps)
}

/// `(width, height, steps)` of the file at `path`.
#[pyfunction]
fn read_header(path: PathBuf) -> PyResult<(i32, i32, i32)> {
    let (header, _) = open_file(&path, DecoderConfig::default()).map_err(to_py_err)?;
    Ok(header_tuple(&header))
}

/// Iterator of `(index, field_a_rows, field_b_rows)` over a frame file.
#[pyclass(module = "rdframes")]
pub struct FrameStream {
    header: Header,
    decoder: FrameDecoder<BufReader<File>>,
}

#[pymethods]
impl FrameStream {
    #[new]
    #[pyo3(signature = (path, inclusive_step_count = true))]
    fn new(path: PathBuf, inclusive_step_count: bool) -> PyResult<Self> {
        let config = DecoderConfig {
            inclusive_step_count,
            ..DecoderConfig::default()
        };
        let (header, decoder) = open_file(&path, config).map_err(to_py_err)?;
        Ok(Self { header, decoder })
    }

    #[getter]
    fn header(&self) -> (i32, i32, i32) {
        header_tuple(&self.header)
    }

    #[getter]
    fn frames_remaining(&self) -> u64 {
        self.decoder.frames_remaining()
    }

    fn __iter__(slf: PyRef<'_, Self>) -> PyRef<'_, Self> {
        slf
    }

    /// Raises once on a decode error, then stops like an exhausted stream.
    fn __next__(mut slf: PyRefMut<'_, Self>) -> PyResult<Option<(u64, Rows, Rows)>> {
        let frame = slf.decoder.next().transpose().map_err(to_py_err)?;
        Ok(frame.map(|f| (f.index, f.field_a.to_rows(), f.field_b.to_rows())))
    }

    fn __repr__(&self) -> String {
        format!("FrameStream({}, state={:?})", self.header.summary(), self.decoder.state())
    }
}

/// Run a simulation described by `config_json` into `outfile`.
/// Returns the run's telemetry as a JSON string.
#[pyfunction]
fn simulate(py: Python<'_>, config_json: &str, outfile: PathBuf) -> PyResult<String> {
    let config = SimulationConfig::from_json_str(config_json)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let snapshot = py
        .allow_threads(|| simulate_to_file(config, &outfile))
        .map_err(to_py_err)?;

    let mut value = serde_json::to_value(&snapshot).map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("path".into(), outfile.display().to_string().into());
    }
    Ok(value.to_string())
}

/// Send library logs to stderr. Returns `False` if logging was already set up.
#[pyfunction]
#[pyo3(signature = (filter = ""))]
fn init_logging(filter: &str) -> bool {
    logging::init(filter)
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add_function(wrap_pyfunction!(read_header, m)?)?;
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    m.add_class::<FrameStream>()?;
    m.add("TruncatedStreamError", py.get_type_bound::<TruncatedStreamError>())?;
    m.add("ShapeError", py.get_type_bound::<ShapeError>())?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
