//! End-to-end tests for `spacey_compiler::compile`.

use spacey_compiler::{
    CompileError, CompileOptions, ImportBinding, SourceType, compile, line_break_count,
};

fn options() -> CompileOptions {
    CompileOptions {
        runtime_name: Some("_".to_string()),
        ..CompileOptions::default()
    }
}

fn typed(source_type: Option<SourceType>, hint: Option<SourceType>) -> CompileOptions {
    CompileOptions {
        source_type,
        hint,
        ..options()
    }
}

#[test]
fn test_type_option() {
    for source_type in [None, Some(SourceType::Module), Some(SourceType::Unambiguous)] {
        let output = compile("import\"a\"", &typed(source_type, None)).unwrap();
        assert!(output.esm, "{source_type:?}");
    }

    let cases = [
        ("1+2", None, false),
        ("1+2", Some(SourceType::Module), true),
        ("\"use module\";1+2", None, true),
        ("'use module';1+2", Some(SourceType::Module), true),
        ("\"use script\";1+2", None, false),
        ("'use script';1+2", Some(SourceType::Module), false),
    ];

    for (source, hint, esm) in cases {
        let output = compile(source, &typed(Some(SourceType::Unambiguous), hint)).unwrap();
        assert_eq!(output.esm, esm, "{source}");

        let output = compile(source, &typed(Some(SourceType::Module), None)).unwrap();
        assert!(output.esm, "{source}");
    }
}

#[test]
fn test_script_type_rejects_module_syntax() {
    let result = compile("1;\nimport\"a\"", &typed(Some(SourceType::Script), None));
    assert_eq!(result, Err(CompileError::ModuleSyntaxInScript { offset: 3 }));
}

#[test]
fn test_esm_option_overrides_classification() {
    let output = compile(
        "\"use script\";export default 1",
        &CompileOptions {
            esm: Some(true),
            ..options()
        },
    )
    .unwrap();
    assert!(output.esm);
    assert!(output.code.contains("_.x([[\"default\""));
}

#[test]
fn test_var_option() {
    for var in [false, true] {
        let output = compile(
            "import a from \"a\"",
            &CompileOptions { var, ..options() },
        )
        .unwrap();
        assert!(output.code.starts_with(if var { "var a" } else { "let a" }));
    }
}

#[test]
fn test_preserves_line_numbers() {
    let sources = [
        "import {\n  a,\n  b\n} from 'm'\nexport {\n  a,\n  b as c\n}\n",
        "export default (\n  a\n)\nexport * from\n  'n'\n",
        "import * as\nns\nfrom 'm'\r\nconsole.log(ns)\r\n",
        "export const x = {\n  y: import('z'),\n}\nexport class K\n{}\n",
        "export\ndefault\nfunction\n()\n{}\n",
    ];

    for source in sources {
        let output = compile(source, &options()).unwrap();
        assert!(output.changed, "{source:?}");
        assert_eq!(
            line_break_count(&output.code),
            line_break_count(source),
            "{source:?} -> {:?}",
            output.code
        );
    }
}

#[test]
fn test_preserves_crlf_newlines() {
    let source = [
        "import {",
        "  strictEqual,",
        "  // blank line",
        "  deepEqual",
        "}",
        "from \"assert\"",
    ]
    .join("\r\n");

    let output = compile(&source, &options()).unwrap();
    assert!(output.code.ends_with(&"\r\n".repeat(5)));
}

#[test]
fn test_dynamic_import_in_script() {
    let output = compile(
        "import(\"a\")",
        &CompileOptions {
            esm: Some(false),
            ..options()
        },
    )
    .unwrap();
    assert!(!output.esm);
    assert!(output.code.contains("i(\"a\")"));
}

#[test]
fn test_does_not_hoist_above_use_strict() {
    let output = compile("\"use strict\";\nimport a from \"a\";\na;", &options()).unwrap();
    assert!(output.code.starts_with("\"use strict\";\nlet a;"));

    let output = compile("'use strict'\n'use module'\nexport var v = 1", &options()).unwrap();
    assert!(
        output
            .code
            .starts_with("'use strict'\n'use module'\n_.x([[\"v\",function(){return v}]]);var v = 1")
    );
}

#[test]
fn test_shebang_is_kept_in_place() {
    let source = "#!/usr/bin/env node -r @std/esm\nimport a from \"a\"";
    let output = compile(source, &options()).unwrap();
    assert!(output.esm);
    assert!(output.code.starts_with("#!/usr/bin/env node -r @std/esm\nlet a"));
}

#[test]
fn test_string_literals_are_not_rewritten() {
    let source = "const s = \"import a from 'b'\";\nconst t = `export default ${1}`;\nimport c from \"c\";\nc(s, 'c');";
    let output = compile(source, &options()).unwrap();
    assert!(output.code.contains("const s = \"import a from 'b'\";"));
    assert!(output.code.contains("const t = `export default ${1}`;"));
    assert!(output.code.ends_with("_.a(\"c\",c)(s, 'c');"));
    assert_eq!(output.temporal_bindings, vec!["c"]);
}

#[test]
fn test_trailing_comments_are_preserved() {
    let output = compile("import\"a\"//trailing comment", &options()).unwrap();
    assert!(output.code.ends_with("//trailing comment"));
}

#[test]
fn test_reserved_method_names_and_destructured_arrows() {
    assert!(compile("({async delete(){}})", &options()).is_ok());
    assert!(compile("({a=1})=>{}", &options()).is_ok());
}

#[test]
fn test_transforms_at_end_of_source() {
    for source in ["import{a}from\"a\"", "import\"a\"", "export{a}", "export default a"] {
        let output = compile(source, &options()).unwrap();
        assert!(output.changed, "{source}");
    }
}

#[test]
fn test_shadowed_imports_are_not_instrumented() {
    let source = "import a from \"a\";\nfunction f(a) { return a }\nconst g = () => { let a = 1; return a };\nf(a);";
    let output = compile(source, &options()).unwrap();
    assert!(output.code.contains("function f(a) { return a }"));
    assert!(output.code.contains("let a = 1; return a };"));
    assert!(output.code.ends_with("f(_.a(\"a\",a));"));
}

#[test]
fn test_parameter_defaults_read_the_import() {
    let source = "import a from \"a\";\nfunction f(x = a) { let a = 1; return a + x }";
    let output = compile(source, &options()).unwrap();
    assert!(output.code.ends_with("function f(x = _.a(\"a\",a)) { let a = 1; return a + x }"));
}

#[test]
fn test_switch_case_scopes() {
    let source = "import a from \"a\";\nswitch (a) { case 1: let a = 2; f(a); break; default: g(a) }\nh(a);";
    let output = compile(source, &options()).unwrap();
    assert!(output.code.ends_with(concat!(
        "switch (_.a(\"a\",a)) { case 1: let a = 2; f(a); break; default: g(a) }\n",
        "h(_.a(\"a\",a));"
    )));
}

#[test]
fn test_new_with_imported_member_callee() {
    let source = "import a from \"a\";\nnew a.b(a);\nnew a.b.c;";
    let output = compile(source, &options()).unwrap();
    assert!(output.code.ends_with(concat!(
        "new (_.a(\"a\",a)).b(_.a(\"a\",a));\n",
        "new (_.a(\"a\",a)).b.c;"
    )));
}

#[test]
fn test_live_binding_output() {
    let source = "import { count, inc } from \"./counter\";\nexport let doubled = count * 2;\nexport { inc as increment };\n";
    let output = compile(source, &options()).unwrap();
    assert_eq!(
        output.code,
        concat!(
            "_.x([[\"doubled\",function(){return doubled}],[\"increment\",function(){return inc}]]);",
            "let count,inc;_.w(\"./counter\",[[\"count\",function(v){count=v}],[\"inc\",function(v){inc=v}]]);\n",
            "let doubled = _.a(\"count\",count) * 2;;_.j([\"doubled\"]);\n",
            ";_.j([\"increment\"]);\n",
        )
    );
    assert_eq!(output.temporal_bindings, vec!["count", "inc"]);
}

#[test]
fn test_import_table() {
    let source = "import d, { b as c } from \"./m\";\nimport * as ns from \"n\";\nimport \"side\";";
    let output = compile(source, &options()).unwrap();
    let binding = |local: &str, specifier: &str, imported: &str| ImportBinding {
        local: local.to_string(),
        specifier: specifier.to_string(),
        imported: imported.to_string(),
    };
    assert_eq!(
        output.imports,
        vec![
            binding("d", "./m", "default"),
            binding("c", "./m", "b"),
            binding("ns", "n", "*"),
        ]
    );
}

#[test]
fn test_generated_runtime_name() {
    let output = compile("import a from \"a\"", &CompileOptions::default()).unwrap();
    assert!(output.runtime_name.starts_with('_'));
    assert!(output.code.contains(&format!("{}.w(\"a\"", output.runtime_name)));
}

#[test]
fn test_source_map_option() {
    let output = compile(
        "import a from \"a\"\na\n",
        &CompileOptions {
            source_map: true,
            filename: Some("main.mjs".to_string()),
            ..options()
        },
    )
    .unwrap();
    let map: serde_json::Value = serde_json::from_str(output.source_map.as_deref().unwrap()).unwrap();
    assert_eq!(map["sources"][0], "main.mjs");
    assert_eq!(map["mappings"], "AAAA;AACA;AACA");

    assert!(compile("1", &options()).unwrap().source_map.is_none());
}

#[test]
fn test_options_from_json() {
    let options: CompileOptions =
        serde_json::from_str(r#"{"type":"unambiguous","hint":"module","var":true,"runtimeName":"rt"}"#)
            .unwrap();
    let output = compile("import a from \"a\"", &options).unwrap();
    assert!(output.code.starts_with("var a;rt.w(\"a\""));
}

#[test]
fn test_parse_errors_propagate() {
    let error = compile("import {", &options()).unwrap_err();
    assert!(matches!(error, CompileError::Parse(_)));
}
