//! Host-callable functions exported to Python.
//!
//! # Responsibility
//! - Decode the interpreter's argument tuple into native integers.
//! - Hand the computation to `sumext_core` and box the result as `int`.
//!
//! # Invariants
//! - Exported functions never panic across the C boundary.
//! - Failures return null with the interpreter's error indicator set; this
//!   layer never builds exception objects of its own.

use log::{debug, trace};
use pyo3::ffi;
use std::ffi::CStr;
use std::os::raw::c_long;
use std::ptr;
use sumext_core::checked_sum;

/// Two C `long`s; the suffix makes `TypeError` messages name `sum()`.
pub(crate) const SUM_ARGS_FORMAT: &CStr = c"ll:sum";

/// `sumext.sum(a, b)`: integer sum of two native `long`s.
///
/// # FFI contract
/// - `METH_VARARGS` calling convention: module object plus argument tuple.
/// - Sync call, no blocking, no shared mutable state; safe to re-enter.
/// - Wrong arity or non-integer operands raise `TypeError`; operands outside
///   the native `long` range raise `OverflowError`.
/// - The result is exact: sums past `i64` are computed with Python ints.
///
/// # Safety
/// Called by the interpreter with the GIL held and `args` pointing at a
/// tuple, as for any `PyCFunction`.
pub unsafe extern "C" fn sum(
    _module: *mut ffi::PyObject,
    args: *mut ffi::PyObject,
) -> *mut ffi::PyObject {
    let mut a: c_long = 0;
    let mut b: c_long = 0;
    if ffi::PyArg_ParseTuple(
        args,
        SUM_ARGS_FORMAT.as_ptr(),
        &mut a as *mut c_long,
        &mut b as *mut c_long,
    ) == 0
    {
        debug!("event=sum module=ext status=error error_code=arg_shape_mismatch");
        return ptr::null_mut();
    }

    // c_long is 32 bits on Windows.
    #[allow(clippy::useless_conversion)]
    let (a, b) = (i64::from(a), i64::from(b));
    match checked_sum(a, b) {
        Some(total) => ffi::PyLong_FromLongLong(total),
        None => {
            trace!("event=sum module=ext status=ok path=widened");
            widened_sum(a, b)
        }
    }
}

unsafe fn widened_sum(a: i64, b: i64) -> *mut ffi::PyObject {
    let lhs = ffi::PyLong_FromLongLong(a);
    if lhs.is_null() {
        return ptr::null_mut();
    }
    let rhs = ffi::PyLong_FromLongLong(b);
    if rhs.is_null() {
        ffi::Py_DECREF(lhs);
        return ptr::null_mut();
    }
    let total = ffi::PyNumber_Add(lhs, rhs);
    ffi::Py_DECREF(lhs);
    ffi::Py_DECREF(rhs);
    total
}
