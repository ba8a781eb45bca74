//! Helper XQuery texts the assertion evaluator submits to the engine.
//!
//! Assertion checks work by re-invoking the engine with the observed result
//! bound to the external variable `$result`. The texts here are part of the
//! runner's observable behavior and are kept literal.
//!
//! Expression fragments from the catalog are interpolated verbatim; the
//! catalog is trusted input and no escaping is applied.

/// Name of the external variable the observed result is bound to.
pub const RESULT_VARIABLE: &str = "result";

/// Wrapper element used to make arbitrary XML fragments well-formed for
/// serialization and diffing.
pub const IGNORABLE_WRAPPER: &str = "ignorable-wrapper";

pub const QUERY_NORMALIZED_SPACE: &str = "normalize-space($result)";

pub const QUERY_ASSERT_STRING_VALUE: &str =
    "string-join(for $r in $result return string($r), \" \")";

pub const QUERY_ASSERT_STRING_VALUE_NORMALIZED_SPACE: &str =
    "normalize-space(string-join(for $r in $result return string($r), \" \"))";

/// Declares `$local:default-serialization`: XML method, no indent, no
/// declaration.
pub const QUERY_DEFAULT_SERIALIZATION: &str = concat!(
    "declare variable $local:default-serialization := ",
    "<output:serialization-parameters ",
    "xmlns:output=\"http://www.w3.org/2010/xslt-xquery-serialization\">",
    "<output:method value=\"xml\"/>",
    "<output:indent value=\"no\"/>",
    "<output:omit-xml-declaration value=\"yes\"/>",
    "</output:serialization-parameters>;\n",
);

/// Serializes `$result` with the default serialization parameters.
pub const QUERY_ASSERT_XML_SERIALIZATION: &str = concat!(
    "declare variable $local:default-serialization := ",
    "<output:serialization-parameters ",
    "xmlns:output=\"http://www.w3.org/2010/xslt-xquery-serialization\">",
    "<output:method value=\"xml\"/>",
    "<output:indent value=\"no\"/>",
    "<output:omit-xml-declaration value=\"yes\"/>",
    "</output:serialization-parameters>;\n",
    "fn:serialize($result, $local:default-serialization)",
);

/// Selects the child nodes of the `ignorable-wrapper` document bound to
/// `$result`, one expected node per child.
pub const QUERY_WRAPPER_CHILDREN: &str = "$result/ignorable-wrapper/node()";

pub fn assert_query(xpath: &str) -> String {
    xpath.to_string()
}

pub fn assert_eq_query(expected: &str) -> String {
    format!("{expected} eq $result")
}

pub fn assert_deep_eq_query(expected: &str) -> String {
    format!("deep-equal(({expected}), $result)")
}

/// Sorts both sequences with a key that tags `xs:string` values, keeping
/// `"1"` distinct from `1`, then compares them deeply.
pub fn assert_permutation_query(expected: &str) -> String {
    format!(
        "declare function local:sort-key($value) {{ \
         if ($value instance of xs:string) then concat(\"str_\", $value) else $value }};\n\
         deep-equal(sort(({expected}), (), local:sort-key#1), \
         sort($result, (), local:sort-key#1))"
    )
}

pub fn serialization_matches_query(regex: &str, flags: &str) -> String {
    format!("fn:matches($result, \"{regex}\", \"{flags}\")")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_space_composes_string_value() {
        assert_eq!(
            QUERY_ASSERT_STRING_VALUE_NORMALIZED_SPACE,
            format!("normalize-space({QUERY_ASSERT_STRING_VALUE})")
        );
    }

    #[test]
    fn serialization_query_extends_preamble() {
        assert!(QUERY_ASSERT_XML_SERIALIZATION.starts_with(QUERY_DEFAULT_SERIALIZATION));
        assert!(QUERY_ASSERT_XML_SERIALIZATION
            .ends_with("fn:serialize($result, $local:default-serialization)"));
    }

    #[test]
    fn default_serialization_parameters() {
        for needle in [
            "http://www.w3.org/2010/xslt-xquery-serialization",
            "<output:method value=\"xml\"/>",
            "<output:indent value=\"no\"/>",
            "<output:omit-xml-declaration value=\"yes\"/>",
        ] {
            assert!(QUERY_DEFAULT_SERIALIZATION.contains(needle), "{needle}");
        }
    }

    #[test]
    fn eq_query_binds_result() {
        assert_eq!(assert_eq_query("2"), "2 eq $result");
    }

    #[test]
    fn permutation_query_tags_strings() {
        let q = assert_permutation_query("(1, 2, 3)");
        assert!(q.contains("concat(\"str_\", $value)"));
        assert!(q.contains("sort(((1, 2, 3)), (), local:sort-key#1)"));
        assert!(q.contains("sort($result, (), local:sort-key#1)"));
    }

    #[test]
    fn matches_query_splices_flags() {
        assert_eq!(
            serialization_matches_query("^<x/>$", "i"),
            "fn:matches($result, \"^<x/>$\", \"i\")"
        );
    }
}
