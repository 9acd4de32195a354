use libc::{c_char, c_double, size_t};

use crate::rpn_converter::{RPNExpr, RpnConverter};
use crate::rpn_evaluator::RpnEvaluator;
use crate::tokenizer;
use std::ffi::{c_void, CStr};

/// Copies `error` into the caller's buffer, truncating it to fit and NUL-terminating it.
unsafe fn fill_error_buffer(output_error: *mut c_char, output_error_len: size_t, error: &str) {
    if output_error.is_null() || output_error_len == 0 {
        return;
    }

    let output_error = std::slice::from_raw_parts_mut(output_error as *mut u8, output_error_len);
    let mut len = error.len().min(output_error_len - 1);
    while !error.is_char_boundary(len) {
        len -= 1;
    }
    output_error[..len].copy_from_slice(&error.as_bytes()[..len]);
    output_error[len] = 0;
}

unsafe fn read_input<'a>(
    input: *const c_char,
    output_error: *mut c_char,
    output_error_len: size_t,
) -> Option<&'a str> {
    if input.is_null() {
        fill_error_buffer(output_error, output_error_len, "Invalid input string pointer!");
        return None;
    }

    match CStr::from_ptr(input).to_str() {
        Ok(input) => Some(input),
        Err(_) => {
            fill_error_buffer(
                output_error,
                output_error_len,
                "Failed to convert the input string to a Rust string!",
            );
            None
        }
    }
}

/// Translate the infix expression and return a handle to its postfix form.
///
/// # Arguments
///
/// * `input` - The NUL-terminated infix expression.
/// * `output_error` - The buffer to write the error message to.
/// * `output_error_len` - The length of the error buffer.
///
/// # Returns
///
/// A handle for [`evaluate_postfix`], to be released with [`free_postfix`]. If an error occurs, the return value is null.
///
/// # Safety
///
/// `input` must be null or a valid C string. The `output_error` buffer must be null or valid for `output_error_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn translate_expression(
    input: *const c_char,
    output_error: *mut c_char,
    output_error_len: size_t,
) -> *mut c_void {
    let Some(input) = read_input(input, output_error, output_error_len) else {
        return std::ptr::null_mut();
    };

    match RpnConverter::convert(tokenizer::tokenize(input)) {
        Ok(rpn) => Box::into_raw(Box::new(rpn)) as *mut c_void,
        Err(e) => {
            fill_error_buffer(
                output_error,
                output_error_len,
                &crate::Error::from(e).to_string(),
            );
            std::ptr::null_mut()
        }
    }
}

/// Evaluate a postfix expression produced by [`translate_expression`].
///
/// # Returns
///
/// The result of the evaluation. If the error buffer was written to, the return value is NaN.
///
/// # Safety
///
/// `expr` must be null or a pointer returned by [`translate_expression`] that was not freed yet. The `output_error` buffer must be null or valid for `output_error_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn evaluate_postfix(
    expr: *const c_void,
    output_error: *mut c_char,
    output_error_len: size_t,
) -> c_double {
    if expr.is_null() {
        fill_error_buffer(output_error, output_error_len, "Invalid expression pointer!");
        return c_double::NAN;
    }

    let rpn = &*(expr as *const RPNExpr);
    match RpnEvaluator::evaluate(rpn) {
        Ok(result) => result,
        Err(e) => {
            fill_error_buffer(
                output_error,
                output_error_len,
                &crate::Error::from(e).to_string(),
            );
            c_double::NAN
        }
    }
}

/// Translate and evaluate an infix expression in one go.
///
/// # Returns
///
/// The result of the evaluation, or NaN with the error buffer filled.
///
/// # Safety
///
/// Same requirements as [`translate_expression`].
#[no_mangle]
pub unsafe extern "C" fn evaluate_expression(
    input: *const c_char,
    output_error: *mut c_char,
    output_error_len: size_t,
) -> c_double {
    let Some(input) = read_input(input, output_error, output_error_len) else {
        return c_double::NAN;
    };

    match crate::calculate(input) {
        Ok(result) => result,
        Err(e) => {
            fill_error_buffer(output_error, output_error_len, &e.to_string());
            c_double::NAN
        }
    }
}

/// Free the postfix expression.
///
/// # Safety
///
/// `expr` must be null or a pointer returned by [`translate_expression`] that was not freed before.
#[no_mangle]
pub unsafe extern "C" fn free_postfix(expr: *mut c_void) {
    if expr.is_null() {
        return;
    }

    drop(Box::from_raw(expr as *mut RPNExpr));
}
