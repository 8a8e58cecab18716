// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Unix-style exit codes (BSD `sysexits.h`) for mapping top-level process
//! results to a shell-observable status.

use std::process::ExitCode as StdExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok = 0,
    /// Usage error: bad CLI arguments.
    Usage = 64,
    /// Input data was incorrect in some way (`EX_DATAERR`).
    DataErr = 65,
    /// An internal software error was detected (`EX_SOFTWARE`).
    Software = 70,
    /// A required external service was unavailable (`EX_UNAVAILABLE`).
    Unavailable = 69,
    /// Insufficient permission for an operation (`EX_NOPERM`).
    NoPerm = 77,
}

impl From<ExitCode> for StdExitCode {
    fn from(code: ExitCode) -> Self {
        StdExitCode::from(code as u8)
    }
}

pub fn map_error_to_exit_code(err: &engine_domain::EngineError) -> ExitCode {
    use engine_domain::EngineError::*;
    match err {
        OntologyIdRequired | MissingAuthorization | InvalidAuthFormat => ExitCode::Usage,
        InvalidSignature | InvalidAudience | UnauthorizedIssuer | MalformedToken(_) => ExitCode::DataErr,
        UpstreamNotFound | UpstreamForbidden | UpstreamError(_) | EmptyToken => ExitCode::Unavailable,
        InsufficientRole | NotCentral | ProjectMismatch => ExitCode::NoPerm,
        _ => ExitCode::Software,
    }
}

pub fn result_to_exit_code<T>(result: Result<T, engine_domain::EngineError>) -> StdExitCode {
    match result {
        Ok(_) => ExitCode::Ok.into(),
        Err(e) => {
            tracing::error!(error = %e, "process exiting with error");
            map_error_to_exit_code(&e).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_domain::EngineError;

    #[test]
    fn maps_ontology_id_required_to_usage() {
        assert_eq!(map_error_to_exit_code(&EngineError::OntologyIdRequired), ExitCode::Usage);
    }

    #[test]
    fn ok_result_maps_to_zero() {
        let code: StdExitCode = result_to_exit_code::<()>(Ok(())).into();
        assert_eq!(format!("{:?}", code), format!("{:?}", StdExitCode::SUCCESS));
    }
}
