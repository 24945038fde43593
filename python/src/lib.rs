//! rdframes-python
//!
//! Python bindings for rdframes-core (PyO3).

use pyo3::prelude::*;

mod ffi;

/// Python module entry point
#[pymodule]
fn rdframes(m: &Bound<'_, PyModule>) -> PyResult<()> {
    ffi::register(m)?;
    Ok(())
}
