use crate::classify::MarkerCache;
use crate::config::ProcessorConfig;
use crate::host::Resolver;
use crate::report::Violation;
use crate::symbols::{Annotation, FunctionDecl, SourceFile};

/// A function that gets a generated screenshot test
#[derive(Debug, Clone)]
pub struct EligibleFunction<'a> {
    pub file: &'a SourceFile,
    pub function: &'a FunctionDecl,
    /// Marker annotations on the function, in declaration order. Never empty.
    pub markers: Vec<&'a Annotation>,
}

/// Outcome of scanning one source file
#[derive(Debug, Default)]
pub struct Selection<'a> {
    pub eligible: Vec<EligibleFunction<'a>>,
    pub violations: Vec<Violation>,
    /// Invalid functions to hand back to the host for a later round
    pub deferred: Vec<&'a FunctionDecl>,
}

/// Whether a file takes part in processing at all
pub fn accepts_file(config: &ProcessorConfig, file: &SourceFile) -> bool {
    file.origin.is_source() && !config.is_excluded(&file.path)
}

pub fn select<'a>(
    resolver: &'a dyn Resolver,
    markers: &mut MarkerCache,
    config: &ProcessorConfig,
    file: &'a SourceFile,
) -> Selection<'a> {
    let mut selection = Selection::default();

    for function in file.functions.iter().filter(|f| !f.synthetic) {
        let found: Vec<&Annotation> = function
            .annotations
            .iter()
            .filter(|annotation| markers.is_marker_annotation(resolver, annotation))
            .collect();

        if function.is_private() {
            if !found.is_empty() {
                tracing::warn!(
                    file = %file.path,
                    function = %function.name,
                    "private preview cannot be referenced from a generated test"
                );
                selection.violations.push(Violation::new(&file.path, &function.name));
            }
            continue;
        }

        if function.has_annotation(&config.ignore_annotation) {
            tracing::debug!(function = %function.qualified_name(), "opted out");
            continue;
        }

        if !resolver.validate(function) {
            let unresolved = function.annotations.iter().any(|annotation| {
                markers.get(&annotation.name).is_none()
                    && resolver.resolve(&annotation.name).is_none()
            });
            if !found.is_empty() || unresolved {
                tracing::debug!(
                    function = %function.qualified_name(),
                    "deferred until its types resolve"
                );
                selection.deferred.push(function);
            }
            continue;
        }

        if found.is_empty() {
            continue;
        }

        selection.eligible.push(EligibleFunction {
            file,
            function,
            markers: found,
        });
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SymbolGraph;
    use crate::symbols::{ClassDecl, Origin, Parameter, TypeRef, Visibility};

    const BASE: &str = crate::config::PREVIEW;

    fn annotation(name: &str) -> Annotation {
        Annotation {
            name: name.to_string(),
            arguments: Vec::new(),
        }
    }

    fn function(name: &str, visibility: Visibility, annotations: &[&str]) -> FunctionDecl {
        FunctionDecl {
            name: name.to_string(),
            package: "com.example".to_string(),
            visibility,
            annotations: annotations.iter().map(|a| annotation(a)).collect(),
            parameters: Vec::new(),
            synthetic: false,
            valid: true,
        }
    }

    fn graph(functions: Vec<FunctionDecl>) -> SymbolGraph {
        let file = SourceFile {
            path: "app/src/main/kotlin/com/example/Sample.kt".to_string(),
            package: "com.example".to_string(),
            origin: Origin::Kotlin,
            functions,
            classes: vec![ClassDecl {
                name: Some("com.example.DevicePreviews".to_string()),
                annotations: vec![annotation(BASE), annotation(BASE)],
                defaults: Vec::new(),
            }],
        };
        let library = |name: &str| ClassDecl {
            name: Some(name.to_string()),
            annotations: Vec::new(),
            defaults: Vec::new(),
        };
        let libraries = vec![library(BASE), library("androidx.compose.runtime.Composable")];
        SymbolGraph::new(vec![file], libraries)
    }

    fn run(graph: &SymbolGraph) -> Selection<'_> {
        let mut markers = MarkerCache::new(BASE);
        select(graph, &mut markers, &ProcessorConfig::default(), &graph.files[0])
    }

    #[test]
    fn test_public_preview_is_eligible_with_all_markers() {
        let graph = graph(vec![function(
            "Greeting",
            Visibility::Public,
            &[BASE, "androidx.compose.runtime.Composable", "com.example.DevicePreviews"],
        )]);
        let selection = run(&graph);
        assert_eq!(selection.eligible.len(), 1);
        let names: Vec<&str> = selection.eligible[0]
            .markers
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec![BASE, "com.example.DevicePreviews"]);
    }

    #[test]
    fn test_private_preview_is_a_violation_not_a_candidate() {
        let graph = graph(vec![
            function("hidden", Visibility::Private, &[BASE]),
            function("helper", Visibility::Private, &["androidx.compose.runtime.Composable"]),
        ]);
        let selection = run(&graph);
        assert!(selection.eligible.is_empty());
        assert_eq!(
            selection.violations,
            vec![Violation::new("app/src/main/kotlin/com/example/Sample.kt", "hidden")]
        );
    }

    #[test]
    fn test_opt_out_wins_over_marker() {
        let graph = graph(vec![function(
            "Skipped",
            Visibility::Public,
            &[BASE, crate::config::IGNORE_PREVIEW],
        )]);
        assert!(run(&graph).eligible.is_empty());
    }

    #[test]
    fn test_invalid_preview_is_deferred() {
        let mut broken = function("Broken", Visibility::Internal, &[BASE]);
        broken.parameters.push(Parameter {
            name: "item".to_string(),
            ty: TypeRef::new(""),
            annotations: Vec::new(),
        });
        let graph = graph(vec![broken, function("Plain", Visibility::Public, &[])]);
        let selection = run(&graph);
        assert!(selection.eligible.is_empty());
        assert_eq!(selection.deferred.len(), 1);
        assert_eq!(selection.deferred[0].name, "Broken");
    }

    #[test]
    fn test_synthetic_functions_are_skipped() {
        let mut generated = function("Greeting", Visibility::Public, &[BASE]);
        generated.synthetic = true;
        let graph = graph(vec![generated]);
        assert!(run(&graph).eligible.is_empty());
    }

    #[test]
    fn test_overloads_are_selected_independently() {
        let mut with_item = function("Card", Visibility::Public, &[BASE]);
        with_item.parameters.push(Parameter {
            name: "item".to_string(),
            ty: TypeRef::new("kotlin.String"),
            annotations: Vec::new(),
        });
        let graph = graph(vec![function("Card", Visibility::Public, &[BASE]), with_item]);
        assert_eq!(run(&graph).eligible.len(), 2);
    }

    #[test]
    fn test_file_filter() {
        let config = ProcessorConfig::default();
        let graph = graph(Vec::new());
        let mut file = graph.files[0].clone();
        assert!(accepts_file(&config, &file));

        file.origin = Origin::Binary;
        assert!(!accepts_file(&config, &file));

        file.origin = Origin::Java;
        file.path = "app/build/generated/ksp/Sample.kt".to_string();
        assert!(!accepts_file(&config, &file));
    }
}
