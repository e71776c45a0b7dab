//! Naming conventions that pair an implementation file with its tests.
//!
//! Pairing works on the path string only, keeping the directory prefix, so
//! `pkg/auth_test.go` pairs with `pkg/auth.go` and never with `auth.go` in
//! another directory.

use plantrace_kernel::FileKindRules;

const SCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// The implementation file a test file exercises, if the name follows a
/// known convention.
pub fn implementation_for_test(test_path: &str) -> Option<String> {
    let (dir, base) = split_dir(test_path);

    let implementation = if let Some(stem) = base.strip_suffix("_test.go") {
        format!("{stem}.go")
    } else if let Some(script) = script_implementation(base) {
        script
    } else if let Some(stem) = base.strip_suffix("_test.py") {
        format!("{stem}.py")
    } else if let Some(rest) = base.strip_prefix("test_").filter(|rest| rest.ends_with(".py")) {
        rest.to_string()
    } else if let Some(stem) = base.strip_suffix("_test.rs") {
        format!("{stem}.rs")
    } else if let Some(stem) = base
        .strip_suffix("_spec.rb")
        .or_else(|| base.strip_suffix("_test.rb"))
        .or_else(|| base.strip_suffix(".test.rb"))
    {
        format!("{stem}.rb")
    } else if let Some(stem) = base.strip_suffix("Test.java") {
        format!("{stem}.java")
    } else {
        return None;
    };

    if implementation.starts_with('.') {
        return None;
    }
    Some(format!("{dir}{implementation}"))
}

/// Pairing that also honors configured test patterns: when no built-in
/// convention applies, the matched test marker is cut from the base name and
/// the extension it swallowed is kept, so `api.it.ts` pairs with `api.ts`.
/// The result must itself be implementation code.
pub fn paired_implementation(test_path: &str, rules: &FileKindRules) -> Option<String> {
    if let Some(implementation) = implementation_for_test(test_path) {
        return Some(implementation);
    }
    let (dir, base) = split_dir(test_path);
    let marker = rules.test_marker(base)?;
    let matched = &base[marker.clone()];
    let kept_extension = matched.rfind('.').map_or("", |dot| &matched[dot..]);
    let implementation = format!(
        "{}{kept_extension}{}",
        &base[..marker.start],
        &base[marker.end..]
    );
    if implementation.starts_with('.') {
        return None;
    }
    let implementation = format!("{dir}{implementation}");
    rules.is_code(&implementation).then_some(implementation)
}

/// Conventional test file name for an implementation file.
pub fn suggest_test_file(implementation_path: &str) -> String {
    let (dir, base) = split_dir(implementation_path);
    let (stem, ext) = match base.rfind('.') {
        Some(dot) if dot > 0 => (&base[..dot], &base[dot + 1..]),
        _ => (base, ""),
    };

    let suggested = match ext {
        "go" => format!("{stem}_test.go"),
        "py" => format!("test_{stem}.py"),
        "java" => format!("{stem}Test.java"),
        "rb" => format!("{stem}_spec.rb"),
        ext if SCRIPT_EXTENSIONS.contains(&ext) => format!("{stem}.test.{ext}"),
        "" => format!("{stem}_test"),
        ext => format!("{stem}_test.{ext}"),
    };
    format!("{dir}{suggested}")
}

fn script_implementation(base: &str) -> Option<String> {
    SCRIPT_EXTENSIONS.iter().find_map(|ext| {
        [".test.", ".spec."].iter().find_map(|marker| {
            base.strip_suffix(format!("{marker}{ext}").as_str())
                .map(|stem| format!("{stem}.{ext}"))
        })
    })
}

/// Splits into (directory prefix including trailing separator, base name).
fn split_dir(path: &str) -> (&str, &str) {
    match path.rfind(['/', '\\']) {
        Some(idx) => (&path[..=idx], &path[idx + 1..]),
        None => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantrace_kernel::RuleExtensions;

    #[test]
    fn pairs_tests_with_implementations() {
        let cases = [
            ("auth_test.go", Some("auth.go")),
            ("pkg/auth/auth_test.go", Some("pkg/auth/auth.go")),
            ("src/auth.test.ts", Some("src/auth.ts")),
            ("src/auth.spec.ts", Some("src/auth.ts")),
            ("ui/button.spec.jsx", Some("ui/button.jsx")),
            ("test_auth.py", Some("auth.py")),
            ("auth_test.py", Some("auth.py")),
            ("src/lexer_test.rs", Some("src/lexer.rs")),
            ("spec/user_spec.rb", Some("spec/user.rb")),
            ("src/UserServiceTest.java", Some("src/UserService.java")),
            ("README.md", None),
            ("_test.go", None),
        ];
        for (test, expected) in cases {
            assert_eq!(implementation_for_test(test).as_deref(), expected, "{test}");
        }
    }

    fn configured_rules(patterns: &[&str]) -> FileKindRules {
        FileKindRules::with_extensions(&RuleExtensions {
            extra_test_patterns: patterns.iter().map(|pattern| pattern.to_string()).collect(),
            extra_code_extensions: vec!["scala".to_string()],
            ..RuleExtensions::default()
        })
        .expect("configured rules compile")
    }

    #[test]
    fn configured_test_patterns_pair_by_stripping_the_marker() {
        let rules = configured_rules(&[r"\.it\.ts$", r"^it_", r"Spec\.scala$", r"\.e2e\."]);
        let cases = [
            ("src/api.it.ts", Some("src/api.ts")),
            ("web/it_login.ts", Some("web/login.ts")),
            ("core/UserSpec.scala", Some("core/User.scala")),
            ("ui/cart.e2e.js", Some("ui/cart.js")),
            ("pkg/auth_test.go", Some("pkg/auth.go")),
            (".it.ts", None),
            ("notes.md", None),
        ];
        for (test, expected) in cases {
            assert_eq!(paired_implementation(test, &rules).as_deref(), expected, "{test}");
        }
    }

    #[test]
    fn suggestions_follow_language_conventions() {
        assert_eq!(suggest_test_file("auth.go"), "auth_test.go");
        assert_eq!(suggest_test_file("src/app.tsx"), "src/app.test.tsx");
        assert_eq!(suggest_test_file("lib/parser.py"), "lib/test_parser.py");
        assert_eq!(suggest_test_file("User.java"), "UserTest.java");
        assert_eq!(suggest_test_file("models/user.rb"), "models/user_spec.rb");
        assert_eq!(suggest_test_file("src/engine.rs"), "src/engine_test.rs");
        assert_eq!(suggest_test_file("Makefile"), "Makefile_test");
    }

    #[test]
    fn suggestion_pairs_back_to_implementation() {
        for implementation in ["auth.go", "src/app.ts", "lib/parser.py", "User.java", "src/engine.rs"] {
            let suggested = suggest_test_file(implementation);
            assert_eq!(
                implementation_for_test(&suggested).as_deref(),
                Some(implementation),
                "{suggested}"
            );
        }
    }
}
