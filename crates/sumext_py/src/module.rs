//! Module descriptor, function table, and the `PyInit_sumext` entry point.
//!
//! # Responsibility
//! - Describe the `sumext` module to the interpreter's import system.
//! - Run the one-time exec step: logging bootstrap and `__version__`.
//!
//! # Invariants
//! - `FUNCTIONS` ends with a zeroed sentinel entry.
//! - The descriptor is handed to the interpreter once and never written by
//!   Rust afterwards.
//! - Exactly one `PyInit_sumext` is compiled, selected by the
//!   `multi-phase-init` feature.

use crate::api;
use log::info;
use pyo3::ffi;
use std::ffi::{CStr, CString};
#[cfg(feature = "multi-phase-init")]
use std::os::raw::c_void;
use std::os::raw::{c_char, c_int};
use std::ptr;
use sumext_core::LoggingConfig;

const MODULE_NAME: &CStr = c"sumext";
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

// The interpreter takes `*mut` pointers into these tables, so they are
// `static mut`; Rust only reads them.
static mut FUNCTIONS: [ffi::PyMethodDef; 2] = [
    ffi::PyMethodDef {
        ml_name: c"sum".as_ptr(),
        ml_meth: ffi::PyMethodDefPointer {
            PyCFunction: api::sum,
        },
        ml_flags: ffi::METH_VARARGS,
        ml_doc: c"sum(a, b)\n--\n\nReturn the integer sum of a and b.".as_ptr(),
    },
    ffi::PyMethodDef::zeroed(),
];

#[cfg(feature = "multi-phase-init")]
static mut SLOTS: [ffi::PyModuleDef_Slot; 2] = [
    ffi::PyModuleDef_Slot {
        slot: ffi::Py_mod_exec,
        value: exec_module as *mut c_void,
    },
    ffi::PyModuleDef_Slot {
        slot: 0,
        value: ptr::null_mut(),
    },
];

// Newer compilers treat `addr_of_mut!` on a static as safe.
#[allow(unused_unsafe)]
static mut MODULE_DEF: ffi::PyModuleDef = ffi::PyModuleDef {
    m_base: ffi::PyModuleDef_HEAD_INIT,
    m_name: MODULE_NAME.as_ptr(),
    m_doc: c"Native integer addition.".as_ptr(),
    m_size: 0,
    m_methods: unsafe { ptr::addr_of_mut!(FUNCTIONS).cast() },
    #[cfg(feature = "multi-phase-init")]
    m_slots: unsafe { ptr::addr_of_mut!(SLOTS).cast() },
    #[cfg(not(feature = "multi-phase-init"))]
    m_slots: ptr::null_mut(),
    m_traverse: None,
    m_clear: None,
    m_free: None,
};

/// Import hook the interpreter resolves by name when loading `sumext`.
///
/// # FFI contract
/// - Called once per process by the import system, with the GIL held.
/// - Returns a new module (single-phase) or the module definition
///   (multi-phase), or null with an exception set.
///
/// # Safety
/// Only the interpreter's import machinery may call this.
#[cfg(not(feature = "multi-phase-init"))]
#[allow(non_snake_case)]
#[no_mangle]
pub unsafe extern "C" fn PyInit_sumext() -> *mut ffi::PyObject {
    init_single_phase()
}

/// Import hook the interpreter resolves by name when loading `sumext`.
///
/// # FFI contract
/// - Called once per process by the import system, with the GIL held.
/// - Returns the module definition; the interpreter creates the module and
///   runs the exec slot.
///
/// # Safety
/// Only the interpreter's import machinery may call this.
#[cfg(feature = "multi-phase-init")]
#[allow(non_snake_case)]
#[no_mangle]
pub unsafe extern "C" fn PyInit_sumext() -> *mut ffi::PyObject {
    init_multi_phase()
}

#[cfg(not(feature = "multi-phase-init"))]
unsafe fn init_single_phase() -> *mut ffi::PyObject {
    let module = ffi::PyModule_Create(ptr::addr_of_mut!(MODULE_DEF));
    if module.is_null() {
        return ptr::null_mut();
    }
    if exec_module(module) != 0 {
        ffi::Py_DECREF(module);
        return ptr::null_mut();
    }
    module
}

#[cfg(feature = "multi-phase-init")]
unsafe fn init_multi_phase() -> *mut ffi::PyObject {
    ffi::PyModuleDef_Init(ptr::addr_of_mut!(MODULE_DEF))
}

unsafe extern "C" fn exec_module(module: *mut ffi::PyObject) -> c_int {
    if bootstrap_logging() != 0 {
        return -1;
    }
    if ffi::PyModule_AddStringConstant(
        module,
        c"__version__".as_ptr(),
        VERSION.as_ptr().cast::<c_char>(),
    ) != 0
    {
        return -1;
    }
    info!(
        "event=module_init module=ext status=ok init_mode={} exports={}",
        init_mode(),
        exported_names().join(",")
    );
    0
}

// A broken logging setup must not break the import; surface it as a
// RuntimeWarning so `-W error` still turns it into a failure.
unsafe fn bootstrap_logging() -> c_int {
    let started = LoggingConfig::from_env().and_then(|config| match config {
        Some(config) => config.apply(),
        None => Ok(()),
    });
    match started {
        Ok(()) => 0,
        Err(err) => {
            let message = CString::new(format!("sumext logging disabled: {err}"))
                .unwrap_or_else(|_| CString::from(c"sumext logging disabled"));
            ffi::PyErr_WarnEx(ffi::PyExc_RuntimeWarning, message.as_ptr(), 1)
        }
    }
}

/// Names in the function table, in order, up to the sentinel.
pub fn exported_names() -> Vec<String> {
    let mut names = Vec::new();
    // SAFETY: FUNCTIONS is never written and ends with a null-named sentinel.
    unsafe {
        let mut entry = ptr::addr_of!(FUNCTIONS).cast::<ffi::PyMethodDef>();
        while !(*entry).ml_name.is_null() {
            names.push(CStr::from_ptr((*entry).ml_name).to_string_lossy().into_owned());
            entry = entry.add(1);
        }
    }
    names
}

/// Initialization protocol compiled into this build.
pub fn init_mode() -> &'static str {
    if cfg!(feature = "multi-phase-init") {
        "multi_phase"
    } else {
        "single_phase"
    }
}

#[cfg(test)]
mod tests {
    use super::{exported_names, init_mode, VERSION};

    #[test]
    fn function_table_exports_sum_only() {
        assert_eq!(exported_names(), vec!["sum".to_string()]);
    }

    #[test]
    fn version_constant_is_nul_terminated() {
        assert!(VERSION.ends_with('\0'));
        assert_eq!(VERSION.trim_end_matches('\0'), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn init_mode_matches_feature() {
        let expected = if cfg!(feature = "multi-phase-init") {
            "multi_phase"
        } else {
            "single_phase"
        };
        assert_eq!(init_mode(), expected);
    }
}
