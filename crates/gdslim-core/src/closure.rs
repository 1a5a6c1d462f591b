//! Ancestor Closure
//!
//! Expands a used-class set with every transitive ancestor, restricted to
//! classes the catalogue actually knows about. A class cannot be compiled
//! without its base classes, so the closure is what makes a generated
//! profile safe to build against.

use std::collections::BTreeSet;

use crate::catalogue::ClassCatalogue;

/// Compute the ancestry closure of `used` over the catalogue.
///
/// Members absent from the catalogue (stale or renamed references) are
/// dropped; so is any ancestor name without its own catalogue record.
/// The result is idempotent (`close(close(s)) == close(s)`), contains every
/// catalogue member of `used`, and has no member whose ancestor is missing
/// from it.
pub fn close(used: &BTreeSet<String>, catalogue: &ClassCatalogue) -> BTreeSet<String> {
    let mut closed = BTreeSet::new();

    for class in used {
        if !catalogue.contains(class) {
            continue;
        }
        closed.insert(class.clone());
        closed.extend(
            catalogue
                .ancestors_of(class)
                .into_iter()
                .filter(|ancestor| catalogue.contains(ancestor)),
        );
    }

    closed
}
