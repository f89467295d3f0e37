#![forbid(unsafe_code)]

//! Environment variable names read by irpninja when deriving the compiler
//! rule table. Shared by the library, its tests, and the test helpers.

/// Fortran compiler invocation.
///
/// # Examples
///
/// ```
/// use toolchain_env::FC_ENV;
/// assert_eq!(FC_ENV, "FC");
/// ```
pub const FC_ENV: &str = "FC";
/// C compiler invocation.
pub const CC_ENV: &str = "CC";
/// C++ compiler invocation.
pub const CXX_ENV: &str = "CXX";
/// Whitespace-separated Fortran compile flags.
pub const FCFLAGS_ENV: &str = "FCFLAGS";
/// Whitespace-separated C compile flags.
pub const CFLAGS_ENV: &str = "CFLAGS";
/// Whitespace-separated C++ compile flags.
pub const CXXFLAGS_ENV: &str = "CXXFLAGS";
/// Extra source files compiled alongside the generated modules.
pub const SRC_ENV: &str = "SRC";
/// Extra object files linked into every executable.
pub const OBJ_ENV: &str = "OBJ";
/// Extra libraries appended to the link command.
pub const LIB_ENV: &str = "LIB";

/// Every variable consulted, in the order they are read.
pub const ALL: [&str; 9] = [
    FC_ENV,
    CC_ENV,
    CXX_ENV,
    FCFLAGS_ENV,
    CFLAGS_ENV,
    CXXFLAGS_ENV,
    SRC_ENV,
    OBJ_ENV,
    LIB_ENV,
];
