use std::sync::LazyLock;

use gocd_defs::BuildVariables;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};

// RFC 3986 unreserved characters, plus `/` so paths stay readable.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-z./_-]+)\}").expect("placeholder pattern is a valid regex")
});

/// Expands `${name}` placeholders in a query-string template.
///
/// Names are lowercase letters, `.`, `/`, `_` and `-`; anything else, such
/// as `${FOO}` or `${build2}`, is plain text and never expanded. Values are
/// percent-encoded (space becomes `%20`, `/` and `~` are kept). A
/// placeholder whose variable is missing is kept literally rather than
/// treated as an error. The template is scanned once, so text coming from a
/// variable is never expanded again.
pub fn substitute(template: &str, variables: &BuildVariables) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => utf8_percent_encode(value, QUERY_VALUE).to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
