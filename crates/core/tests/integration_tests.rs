//! Integration tests for comptree-core
//!
//! These tests verify that the core functionality works together correctly
//! by completing whole lines against realistic command trees.

use comptree_core::{
    command_definitions::{
        ArgDefinition as Arg, CommandDefinition as Cmd, FlagDefinition as Flag,
    },
    completion::Completer,
    error::Error,
    file_handling::load_model,
    interpolation::Vars,
    model::CommandTree,
    predictors::{PredictSet, PredictorRegistry},
    resolver::ResolvePolicy,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn predictors() -> PredictorRegistry {
    PredictorRegistry::new()
        .with("things", PredictSet::new(["thing1", "thing2"]))
        .with("otherthings", PredictSet::new(["otherthing1", "otherthing2"]))
}

fn my_app() -> Cmd {
    Cmd::new("myApp")
        .flag(Flag::new("global").takes_value())
        .subcommand(
            Cmd::new("foo")
                .flag(Flag::new("lion").takes_value())
                .flag(Flag::new("bar").predictor("things"))
                .flag(Flag::new("baz"))
                .flag(Flag::new("tata").takes_value().alias("titi"))
                .flag(Flag::new("xuxu").takes_value().alias("xoxo").alias("xixi"))
                .flag(Flag::new("qux").hidden())
                .flag(Flag::new("quy").completion(false))
                .flag(Flag::new("quz").hidden().completion(true))
                .subcommand(Cmd::new("rabbit"))
                .subcommand(Cmd::new("eagle").completion(false).flag(Flag::new("wings")))
                .subcommand(Cmd::new("duck").alias("bird")),
        )
        .subcommand(
            Cmd::new("bar")
                .set("a", "other")
                .arg(Arg::new("tiger").predictor("things"))
                .arg(Arg::new("bear").predictor("otherthings"))
                .arg(Arg::new("elephant").predictor("${a}${b}").set("b", "things"))
                .flag(Flag::new("omg").required().enum_values(["oh", "my", "gizzles"]))
                .flag(
                    Flag::new("number")
                        .required()
                        .short('n')
                        .enum_values(["1", "2", "3"]),
                )
                .flag(Flag::new("boofl").short('b')),
        )
        .subcommand(Cmd::new("baz").hidden())
}

fn completer() -> Completer {
    Completer::new(CommandTree::new(my_app()).unwrap(), predictors())
}

fn complete(completer: &Completer, line: &str) -> Vec<String> {
    completer.complete(line, line.len()).sorted()
}

fn want(values: &[&str]) -> Vec<String> {
    let mut values: Vec<String> = values.iter().map(ToString::to_string).collect();
    values.sort();
    values
}

#[test]
fn test_subcommands() {
    let completer = completer();
    assert_eq!(complete(&completer, "myApp "), want(&["foo", "bar"]));
    assert_eq!(complete(&completer, "myApp foo"), want(&["foo"]));
    assert_eq!(complete(&completer, "myApp foo "), want(&["rabbit", "duck", "bird"]));
    assert_eq!(complete(&completer, "myApp foo r"), want(&["rabbit"]));
}

#[test]
fn test_flags_include_ancestors_and_aliases() {
    let completer = completer();
    let foo_flags = [
        "--lion", "--bar", "--baz", "--tata", "--titi", "--xuxu", "--xoxo", "--xixi", "--quz",
        "--help", "-h", "--global",
    ];
    assert_eq!(complete(&completer, "myApp foo -"), want(&foo_flags));

    let long_only: Vec<&str> = foo_flags.iter().copied().filter(|f| *f != "-h").collect();
    assert_eq!(complete(&completer, "myApp foo --"), want(&long_only));
}

#[test]
fn test_supplied_flag_is_not_offered_again() {
    let completer = completer();
    assert_eq!(
        complete(&completer, "myApp foo --baz -"),
        want(&[
            "--lion", "--bar", "--tata", "--titi", "--xuxu", "--xoxo", "--xixi", "--quz", "--help",
            "-h", "--global",
        ])
    );
    assert_eq!(complete(&completer, "myApp foo --baz "), want(&["rabbit", "duck", "bird"]));
}

#[test]
fn test_flag_values() {
    let completer = completer();
    assert!(complete(&completer, "myApp foo --lion ").is_empty());
    assert_eq!(complete(&completer, "myApp foo --bar "), want(&["thing1", "thing2"]));
    assert_eq!(complete(&completer, "myApp bar --omg "), want(&["oh", "my", "gizzles"]));
    assert_eq!(complete(&completer, "myApp foo --bar=thing"), want(&["--bar=thing1", "--bar=thing2"]));
}

#[test]
fn test_positional_arguments() {
    let completer = completer();
    assert_eq!(complete(&completer, "myApp bar "), want(&["thing1", "thing2"]));
    assert_eq!(complete(&completer, "myApp bar thing"), want(&["thing1", "thing2"]));
    assert_eq!(complete(&completer, "myApp bar thing1 "), want(&["otherthing1", "otherthing2"]));
    assert_eq!(
        complete(&completer, "myApp bar thing1 otherthing1 "),
        want(&["otherthing1", "otherthing2"])
    );
    assert!(complete(&completer, "myApp bar thing1 otherthing1 x ").is_empty());
}

#[test]
fn test_boolean_flags_do_not_take_values() {
    let completer = completer();
    assert_eq!(complete(&completer, "myApp bar -b "), want(&["thing1", "thing2"]));
    assert_eq!(
        complete(&completer, "myApp bar -b thing1 -"),
        want(&["-n", "--number", "--omg", "--help", "-h", "--global"])
    );
    assert_eq!(complete(&completer, "myApp bar -b thing1 --omg "), want(&["oh", "my", "gizzles"]));
    assert_eq!(
        complete(&completer, "myApp bar -b thing1 --omg gizzles "),
        want(&["otherthing1", "otherthing2"])
    );
}

#[test]
fn test_inline_global_flag_value() {
    let completer = completer();
    assert_eq!(complete(&completer, "myApp --global=test "), want(&["foo", "bar"]));
    assert_eq!(complete(&completer, "myApp foo --global=test "), want(&["rabbit", "duck", "bird"]));
    assert_eq!(complete(&completer, "myApp bar --global=test "), want(&["thing1", "thing2"]));
}

#[test]
fn test_hidden_and_disabled_commands() {
    let completer = completer();
    assert!(complete(&completer, "myApp b").iter().all(|c| c != "baz"));
    assert!(complete(&completer, "myApp foo e").is_empty());
    assert!(complete(&completer, "myApp foo eagle ").is_empty());

    // Hidden commands are still entered when typed out.
    assert_eq!(complete(&completer, "myApp baz -"), want(&["--help", "-h", "--global"]));
}

#[test]
fn test_lenient_policy() {
    let lenient = completer().with_policy(ResolvePolicy {
        enter_disabled: true,
        descend_after_args: false,
    });
    assert_eq!(complete(&lenient, "myApp foo eagle --w"), want(&["--wings"]));
    assert!(complete(&completer(), "myApp foo eagle --w").is_empty());
}

#[test]
fn test_cumulative_argument() {
    let registry = PredictorRegistry::new().with("sources", PredictSet::new(["src1", "src2", "src3"]));
    let tree = CommandTree::new(
        Cmd::new("myApp")
            .flag(Flag::new("verbose"))
            .arg(Arg::new("sources").predictor("sources").cumulative()),
    )
    .unwrap();
    let completer = Completer::new(tree, registry);

    for line in [
        "myApp ",
        "myApp src",
        "myApp src1 ",
        "myApp src1 src2 src3 ",
        "myApp --verbose src1 ",
        "myApp src1 --verbose src2 ",
    ] {
        assert_eq!(complete(&completer, line), want(&["src1", "src2", "src3"]), "{line}");
    }
}

#[test]
fn test_cumulative_after_single_argument() {
    let registry = PredictorRegistry::new()
        .with("dests", PredictSet::new(["dest1", "dest2"]))
        .with("sources", PredictSet::new(["src1", "src2", "src3"]));
    let tree = CommandTree::new(
        Cmd::new("myApp")
            .arg(Arg::new("dest").predictor("dests"))
            .arg(Arg::new("sources").predictor("sources").cumulative()),
    )
    .unwrap();
    let completer = Completer::new(tree, registry);

    assert_eq!(complete(&completer, "myApp "), want(&["dest1", "dest2"]));
    for line in ["myApp dest1 ", "myApp dest1 src1 ", "myApp dest1 src1 src2 "] {
        assert_eq!(complete(&completer, line), want(&["src1", "src2", "src3"]), "{line}");
    }
}

#[test]
fn test_predictor_name_interpolation() {
    let tree = CommandTree::new(
        Cmd::new("myApp")
            .flag(Flag::new("plain").predictor("${VAR}"))
            .flag(Flag::new("fallback").predictor("${OTHER=things}"))
            .flag(Flag::new("broken").predictor("${MISSING}")),
    )
    .unwrap();
    let vars: Vars = [("VAR", "otherthings")].into_iter().collect();
    let completer = Completer::new(tree, predictors()).with_vars(vars);

    assert_eq!(complete(&completer, "myApp --plain "), want(&["otherthing1", "otherthing2"]));
    assert_eq!(complete(&completer, "myApp --fallback "), want(&["thing1", "thing2"]));

    let broken = completer.complete("myApp --broken ", 15);
    assert!(broken.is_empty());
    assert!(matches!(&broken.problems[0], Error::UndefinedVariable { name, .. } if name == "MISSING"));
}

#[test]
fn test_same_request_same_answer() {
    let completer = completer();
    let first = completer.complete("myApp foo -", 11);
    let second = completer.complete("myApp foo -", 11);
    assert_eq!(first.candidates, second.candidates);
}

#[test]
fn test_completion_from_model_file() {
    let yaml_content = r#"
vars:
  kind: names
predictors:
  names: [Ben, Liz, Bob]
command:
  name: greet
  flags:
    - { name: loud, short: l }
  commands:
    - name: hello
      aliases: [hi]
      args:
        - { name: who, predictor: "${kind}", cumulative: true }
    - name: wave
      flags:
        - { name: hand, enum: [left, right] }
"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{yaml_content}").unwrap();

    let completer = Completer::from_model(load_model(temp_file.path()).unwrap());

    assert_eq!(complete(&completer, "greet "), want(&["hello", "hi", "wave"]));
    assert_eq!(complete(&completer, "greet hi B"), want(&["Ben", "Bob"]));
    assert_eq!(complete(&completer, "greet hello Ben "), want(&["Ben", "Liz", "Bob"]));
    assert_eq!(complete(&completer, "greet wave --hand "), want(&["left", "right"]));
    assert_eq!(complete(&completer, "greet wave -"), want(&["--hand", "--loud", "-l", "--help", "-h"]));
}

#[test]
fn test_invalid_model_file() {
    let yaml_content = r#"
command:
  name: greet
  commands:
    - name: hello
    - name: hello
"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{yaml_content}").unwrap();

    let result = load_model(temp_file.path());
    assert!(matches!(result, Err(Error::DuplicateCommandName(..))));
}

#[test]
fn test_model_file_flag_values() {
    let yaml_content = r#"
predictors:
  names: [Ben, Liz]
command:
  name: greet
  flags:
    - { name: hand, enum: [left, right] }
    - { name: who, predictor: names }
  commands:
    - name: hello
"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{yaml_content}").unwrap();

    let completer = Completer::from_model(load_model(temp_file.path()).unwrap());

    assert_eq!(complete(&completer, "greet --hand "), want(&["left", "right"]));
    assert_eq!(complete(&completer, "greet --who "), want(&["Ben", "Liz"]));
    assert_eq!(complete(&completer, "greet --who Ben "), want(&["hello"]));
}

fn is_subset(smaller: &[String], larger: &[String]) -> bool {
    smaller.iter().all(|candidate| larger.contains(candidate))
}

#[test]
fn test_longer_prefix_never_adds_candidates() {
    let completer = completer();

    for lines in [
        ["myApp bar ", "myApp bar t", "myApp bar thing1"],
        ["myApp foo ", "myApp foo r", "myApp foo rabbit"],
        ["myApp foo -", "myApp foo --", "myApp foo --ba"],
        ["myApp bar --omg ", "myApp bar --omg g", "myApp bar --omg gizzles"],
    ] {
        let unfiltered = complete(&completer, lines[0]);
        assert!(!unfiltered.is_empty(), "{}", lines[0]);

        let mut previous = unfiltered.clone();
        for line in &lines[1..] {
            let narrowed = complete(&completer, line);
            assert!(is_subset(&narrowed, &previous), "{line}");
            assert!(is_subset(&narrowed, &unfiltered), "{line}");
            previous = narrowed;
        }
    }
}
