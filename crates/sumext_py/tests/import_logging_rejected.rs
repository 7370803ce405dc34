//! Import with a relative `SUMEXT_LOG_DIR`: the module still loads and the
//! bad setting is reported as a `RuntimeWarning`.
//!
//! Own test binary: one interpreter and one logger per process.

use pyo3::ffi;
use pyo3::prelude::*;
use pyo3::types::PyDict;

#[test]
fn relative_log_dir_warns_instead_of_failing_the_import() {
    std::env::set_var(sumext_core::LOG_DIR_ENV, "relative/dir");
    let status =
        unsafe { ffi::PyImport_AppendInittab(c"sumext".as_ptr(), Some(sumext::PyInit_sumext)) };
    assert_eq!(status, 0);
    pyo3::prepare_freethreaded_python();

    Python::with_gil(|py| {
        let scope = PyDict::new(py);
        py.run(
            c"import warnings
with warnings.catch_warnings(record=True) as caught:
    warnings.simplefilter('always')
    import sumext
messages = [str(w.message) for w in caught if issubclass(w.category, RuntimeWarning)]
total = sumext.sum(2, 3)
",
            Some(&scope),
            None,
        )
        .expect("import must succeed despite bad logging config");

        let messages: Vec<String> = scope
            .get_item("messages")
            .expect("lookup")
            .expect("messages recorded")
            .extract()
            .expect("list of str");
        assert_eq!(messages.len(), 1, "{messages:?}");
        assert!(
            messages[0].contains("log_dir must be an absolute path"),
            "{}",
            messages[0]
        );

        let total: i64 = scope
            .get_item("total")
            .expect("lookup")
            .expect("total computed")
            .extract()
            .expect("int");
        assert_eq!(total, 5);
    });

    assert!(sumext_core::logging_status().is_none());
}
