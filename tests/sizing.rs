/*
Metadata of `samples/hello.json`, roughly the following source with compiler generated members
left out:

using System;
using Shared;

namespace Hello
{
    public class Program
    {
        static readonly string Greeting = "Hello, World!";
        static readonly int[] Primes = { 2, 3, 5, 7, 11 };
        static Mode Mode; // byte backed enum from Shared.dll

        public static void Main(string[] args) { var c = new Counter(); c.Increment(); Print(Greeting); }
        static void Print(string text) => Console.WriteLine(text);
        static void Print(string format, object arg) => Console.WriteLine(format, arg);

        [Serializable]
        public class Counter : IMarker
        {
            int count;
            public int Value => count;
            public event EventHandler Changed;
            public void Increment() { count++; Changed?.Invoke(this, EventArgs.Empty); }
        }
    }
}

namespace Hello.Properties
{
    // ResGen output; the module also links Shared.Strings.resources and carries Win32 version
    // and manifest resources
    internal class Resources { ... }
}
*/

use std::path::PathBuf;

use dotsizer::{
    metadata::{provider::ModuleMetadata, snapshot::ModuleSnapshot},
    sizer::{
        cost::CostModel,
        tree::{NodeKind, SizeTree, FILTERED, OTHER_OVERHEAD},
        walker::RESOURCES,
    },
    Error, Sizer,
};

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/samples")
        .join(name)
}

fn load(name: &str) -> ModuleSnapshot {
    ModuleSnapshot::from_path(sample(name)).unwrap()
}

fn children(tree: &SizeTree, path: &[&str]) -> Vec<(String, u64)> {
    tree.find(path)
        .unwrap()
        .children()
        .map(|child| (child.label().to_string(), child.cost()))
        .collect()
}

fn owned(expected: &[(&str, u64)]) -> Vec<(String, u64)> {
    expected
        .iter()
        .map(|(label, cost)| ((*label).to_string(), *cost))
        .collect()
}

#[test]
fn hello_top_level() {
    let module = load("hello.json");
    let report = Sizer::new()
        .analyze(&module, module.file_size.unwrap())
        .unwrap();
    let tree = report.tree();

    assert_eq!(report.name(), "Hello");
    assert_eq!(report.unresolved_types(), 0);
    assert_eq!(report.estimated_size(), 2651);
    assert_eq!(tree.root().label(), "Hello");
    assert_eq!(tree.root().cost(), 4096);
    assert!(tree.root().is_expanded());

    assert_eq!(
        children(tree, &[]),
        owned(&[
            (OTHER_OVERHEAD, 1445),
            (RESOURCES, 1394),
            ("Hello", 1229),
            ("<Module>", 28),
        ])
    );
    tree.verify().unwrap();
}

#[test]
fn hello_resources() {
    let module = load("hello.json");
    let report = Sizer::new().analyze(&module, 4096).unwrap();

    assert_eq!(
        children(report.tree(), &[RESOURCES]),
        owned(&[
            ("Resource: VersionInfo #1", 724),
            ("Resource: Manifest #1", 490),
            ("Manifest Resource: Hello.Properties.Resources.resources", 180),
        ])
    );
}

#[test]
fn hello_program() {
    let module = load("hello.json");
    let report = Sizer::new().analyze(&module, 4096).unwrap();
    let tree = report.tree();

    let program = tree.find(&["Hello", "Program"]).unwrap();
    assert_eq!(program.kind(), NodeKind::Path);
    assert_eq!(program.own_cost(), 33);
    assert_eq!(program.cost(), 877);

    assert_eq!(
        children(tree, &["Hello", "Program"]),
        owned(&[
            ("Counter", 428),
            ("Main", 86),
            ("Print", 84),
            (".cctor", 74),
            ("Print", 57),
            ("3 Fields (Overhead)", 36),
            (".ctor", 32),
            ("Static Field: Greeting", 26),
            ("Static Field: Primes", 20),
            ("Static Field: Mode", 1),
        ])
    );

    assert_eq!(
        children(tree, &["Hello", "Program", "Counter"]),
        owned(&[
            ("remove_Changed", 114),
            ("add_Changed", 111),
            ("Increment", 49),
            ("get_Value", 36),
            (".ctor", 32),
            ("1 Events (Overhead)", 13),
            ("1 Fields (Overhead)", 11),
            ("1 Properties (Overhead)", 11),
        ])
    );
    assert_eq!(
        tree.find(&["Hello", "Program", "Counter"])
            .unwrap()
            .own_cost(),
        51
    );
}

#[test]
fn hello_unmeasurable_statics_are_omitted() {
    let module = load("hello.json");
    let report = Sizer::new().analyze(&module, 4096).unwrap();

    let resources = report
        .tree()
        .find(&["Hello", "Properties", "Resources"])
        .unwrap();
    assert_eq!(resources.cost(), 352);
    assert!(resources
        .children()
        .all(|child| !child.label().starts_with("Static Field")));
    assert!(report
        .tree()
        .walk()
        .all(|node| node.kind() != NodeKind::Element || node.cost() > 0));
}

#[test]
fn hello_filtered() {
    let module = load("hello.json");
    let report = Sizer::new().with_filter(100).analyze(&module, 4096).unwrap();
    let tree = report.tree();

    assert_eq!(tree.total(), 4096);
    tree.verify().unwrap();

    assert_eq!(
        children(tree, &[]),
        owned(&[
            (OTHER_OVERHEAD, 1445),
            (RESOURCES, 1394),
            ("Hello", 1229),
            (FILTERED, 28),
        ])
    );
    assert_eq!(
        children(tree, &["Hello", "Program"]),
        owned(&[("Counter", 428), (FILTERED, 416)])
    );
    assert_eq!(
        children(tree, &["Hello", "Program", "Counter"]),
        owned(&[
            (FILTERED, 152),
            ("remove_Changed", 114),
            ("add_Changed", 111)
        ])
    );
    assert_eq!(
        children(tree, &["Hello", "Properties", "Resources"]),
        owned(&[(FILTERED, 288)])
    );
}

#[test]
fn hello_custom_cost_model() {
    let module = load("hello.json");
    let model = CostModel::from_path(sample("cost_model.json")).unwrap();
    let report = Sizer::new()
        .with_cost_model(model)
        .analyze(&module, 4096)
        .unwrap();

    let main = report
        .tree()
        .find(&["Hello", "Program"])
        .unwrap()
        .children()
        .find(|child| child.label() == "Main")
        .unwrap();
    assert_eq!(main.cost(), 64);
    assert_eq!(report.tree().total(), 4096);
}

#[test]
fn hello_too_small() {
    let module = load("hello.json");
    match Sizer::new().analyze(&module, 2000) {
        Err(Error::NegativeResidual { total, estimated }) => {
            assert_eq!(total, 2000);
            assert_eq!(estimated, 2651);
        }
        other => panic!("Expected NegativeResidual, got {other:?}"),
    }
}

#[test]
fn hello_json_report() {
    let module = load("hello.json");
    let report = Sizer::new().analyze(&module, 4096).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["name"], "Hello");
    assert_eq!(json["tree"]["cost"], 4096);
    assert_eq!(json["tree"]["children"][0]["label"], OTHER_OVERHEAD);
    assert_eq!(json["tree"]["children"][0]["kind"], "overhead");
    assert_eq!(json["tree"]["children"][1]["children"][0]["cost"], 724);
}

#[test]
fn partial_module() {
    let module = load("partial.json");
    assert_eq!(module.file_name(), "Partial");

    let report = Sizer::new().analyze(&module, 2000).unwrap();
    let tree = report.tree();

    assert_eq!(report.unresolved_types(), 2);
    assert_eq!(report.estimated_size(), 144);
    assert_eq!(
        children(tree, &[]),
        owned(&[
            (OTHER_OVERHEAD, 1856),
            ("Lib", 97),
            ("Init", 34),
            ("1 Fields in Partial (Overhead)", 13),
        ])
    );
    assert_eq!(
        children(tree, &["Lib", "Broken"]),
        owned(&[("Load", 44), ("2 Fields (Overhead)", 23)])
    );
    assert!(tree.find(&[RESOURCES]).is_none());
}

#[test]
fn analyze_file_uses_disk_length() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Hello.exe");
    std::fs::write(&path, vec![0u8; 8192]).unwrap();

    let module = load("hello.json");
    let report = Sizer::new().analyze_file(&module, &path).unwrap();
    assert_eq!(report.total_size(), 8192);
    assert_eq!(report.overhead_size(), 8192 - 2651);
}

#[test]
fn batch() {
    let modules = vec![
        (load("hello.json"), 4096),
        (load("partial.json"), 2000),
        (load("partial.json"), 100),
    ];

    let reports = Sizer::new().analyze_batch(&modules);
    assert_eq!(reports[0].as_ref().unwrap().tree().total(), 4096);
    assert_eq!(reports[1].as_ref().unwrap().unresolved_types(), 2);
    assert!(matches!(
        reports[2],
        Err(Error::NegativeResidual { total: 100, .. })
    ));
}
