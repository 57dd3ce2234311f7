use super::{GeneratedFragment, Generator, ImportSet, Output};
use crate::config::ProcessorConfig;
use crate::host::Resolver;
use crate::select::EligibleFunction;
use crate::symbols::{
    Annotation, Argument, ClassDecl, FunctionDecl, Parameter, TypeRef, Value, Visibility,
};

/// Emits Kotlin screenshot tests
pub struct KotlinGenerator<'c> {
    config: &'c ProcessorConfig,
}

impl<'c> KotlinGenerator<'c> {
    pub fn new(config: &'c ProcessorConfig) -> Self {
        Self { config }
    }

    /// First parameter carrying the provider annotation, with its position
    fn provider_parameter<'f>(
        &self,
        function: &'f FunctionDecl,
    ) -> Option<(usize, &'f Parameter, &'f Annotation)> {
        function.parameters.iter().enumerate().find_map(|(index, parameter)| {
            parameter
                .annotations
                .iter()
                .find(|annotation| annotation.name == self.config.preview_parameter_annotation)
                .map(|annotation| (index, parameter, annotation))
        })
    }

    /// Only the provider argument survives on the parameter annotation
    fn provider_arguments<'a>(&self, annotation: &'a Annotation) -> Vec<&'a Argument> {
        annotation
            .arguments
            .iter()
            .enumerate()
            .filter(|(index, argument)| match &argument.name {
                Some(name) => *name == self.config.provider_argument,
                None => *index == 0,
            })
            .map(|(_, argument)| argument)
            .collect()
    }
}

impl Generator for KotlinGenerator<'_> {
    fn generate(
        &self,
        resolver: &dyn Resolver,
        eligible: &EligibleFunction<'_>,
        imports: &mut ImportSet,
    ) -> GeneratedFragment {
        let function = eligible.function;
        let mut output = Output::new();

        for marker in &eligible.markers {
            let kept = non_default_arguments(marker, resolver.resolve(&marker.name));
            output.line(&render_annotation(marker, &kept, imports));
        }
        for fixed in [&self.config.screenshot_test_annotation, &self.config.composable_annotation] {
            output.line(&format!("@{}", imports.reference(fixed)));
        }

        let (parameters, forwarded) = match self.provider_parameter(function) {
            Some((index, parameter, provider)) => {
                let kept = self.provider_arguments(provider);
                let annotation = render_annotation(provider, &kept, imports);
                let ty = render_type(&parameter.ty, imports);

                let signature = format!("{} {}: {}", annotation, parameter.name, ty);
                // Positional only works while the provider comes first
                let call = if index == 0 {
                    parameter.name.clone()
                } else {
                    format!("{0} = {0}", parameter.name)
                };
                (signature, call)
            }
            None => (String::new(), String::new()),
        };

        let modifier = match function.visibility {
            Visibility::Internal => "internal ",
            _ => "",
        };
        let function_name = format!("{}{}", function.name, self.config.suffix);

        output.line(&format!("{}fun {}({}) {{", modifier, function_name, parameters));
        output.indent(1);
        output.line(&format!("{}({})", function.name, forwarded));
        output.push("}");

        GeneratedFragment {
            function_name,
            code: output.finish(),
        }
    }

    fn render_file(
        &self,
        package: &str,
        imports: &ImportSet,
        fragments: &[GeneratedFragment],
    ) -> String {
        let mut sections = Vec::with_capacity(fragments.len() + 2);
        if !package.is_empty() {
            sections.push(format!("package {}", package));
        }
        if !imports.is_empty() {
            let lines: Vec<String> =
                imports.iter().map(|name| format!("import {}", name)).collect();
            sections.push(lines.join("\n"));
        }
        sections.extend(fragments.iter().map(|fragment| fragment.code.clone()));

        let mut file = sections.join("\n\n");
        file.push('\n');
        file
    }
}

/// Arguments whose value differs from the annotation class's declared default.
/// Everything is kept when the annotation class does not resolve.
fn non_default_arguments<'a>(
    annotation: &'a Annotation,
    declaration: Option<&ClassDecl>,
) -> Vec<&'a Argument> {
    annotation
        .arguments
        .iter()
        .filter(|argument| match (&argument.name, declaration) {
            (Some(name), Some(declaration)) => {
                declaration.default_for(name) != Some(&argument.value)
            }
            _ => true,
        })
        .collect()
}

fn render_annotation(
    annotation: &Annotation,
    arguments: &[&Argument],
    imports: &mut ImportSet,
) -> String {
    let name = imports.reference(&annotation.name);
    if arguments.is_empty() {
        format!("@{}", name)
    } else {
        format!("@{}({})", name, render_arguments(arguments, imports))
    }
}

fn render_arguments(arguments: &[&Argument], imports: &mut ImportSet) -> String {
    let rendered: Vec<String> = arguments
        .iter()
        .map(|argument| {
            let value = render_value(&argument.value, imports);
            match &argument.name {
                Some(name) => format!("{} = {}", name, value),
                None => value,
            }
        })
        .collect();
    rendered.join(", ")
}

fn render_value(value: &Value, imports: &mut ImportSet) -> String {
    match value {
        Value::String(text) => quote(text),
        Value::Type(ty) => format!("{}::class", imports.reference(&ty.name)),
        Value::Enum { ty, entry } => format!("{}.{}", imports.reference(&ty.name), entry),
        Value::List(items) => {
            let rendered: Vec<String> =
                items.iter().map(|item| render_value(item, imports)).collect();
            format!("[{}]", rendered.join(", "))
        }
        // Annotation-typed arguments are written without `@`
        Value::Annotation(nested) => {
            let name = imports.reference(&nested.name);
            let arguments: Vec<&Argument> = nested.arguments.iter().collect();
            format!("{}({})", name, render_arguments(&arguments, imports))
        }
        Value::Literal(text) => text.clone(),
    }
}

/// Kotlin spelling of a type, `Map<String, *>?` style
fn render_type(ty: &TypeRef, imports: &mut ImportSet) -> String {
    let mut rendered = imports.reference(&ty.name);
    if !ty.arguments.is_empty() {
        let arguments: Vec<String> = ty
            .arguments
            .iter()
            .map(|argument| match argument {
                Some(argument) => render_type(argument, imports),
                None => "*".to_string(),
            })
            .collect();
        rendered.push('<');
        rendered.push_str(&arguments.join(", "));
        rendered.push('>');
    }
    if ty.nullable {
        rendered.push('?');
    }
    rendered
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '$' => quoted.push_str("\\$"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
