use crate::roster::audit::error::Result;
use crate::roster::audit::matching::{DiagnosticsSink, are_equivalent};
use crate::roster::audit::model::Member;

/// Returns `true` when some candidate is equivalent to `member`.
///
/// Candidates are scanned in order and the scan stops at the first hit, so
/// only that pairing is reported to the sink.
pub fn contains(
    member: &Member,
    candidates: &[Member],
    sink: &mut dyn DiagnosticsSink,
) -> Result<bool> {
    for candidate in candidates {
        if are_equivalent(member, candidate, sink)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Members of `reference` with no equivalent in `exclude`, in `reference`
/// order.
pub fn difference<'a>(
    reference: &'a [Member],
    exclude: &[Member],
    sink: &mut dyn DiagnosticsSink,
) -> Result<Vec<&'a Member>> {
    let mut missing = Vec::new();
    for member in reference {
        if !contains(member, exclude, sink)? {
            missing.push(member);
        }
    }
    Ok(missing)
}
