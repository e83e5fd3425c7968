//! Script compiler driver
//!
//! A compile runs in strict phases: the front end builds an AST, imports are
//! loaded and merged into the import table, inheritance overlays every object
//! onto its base, variables are expanded, and finally each top-level object is
//! handed to its translator. Each phase sees the final tree shape of the one
//! before it.

use std::collections::BTreeMap;

use super::ast::{AbstractNode, AtomNode, ObjectNode, VariableAccessNode};
use super::builder::{build, build_values, Ast};
use super::error::{CompileError, Diagnostics, ErrorCode, Location};
use super::lexer::tokenize;
use super::listener::CompilerListener;
use super::parser::{parse, parse_chunk};
use super::translators::{translate_object, Translator};
use crate::config::CompilerConfig;
use crate::resources::ScriptLoader;
use crate::system::MaterialSystem;

/// Lexically nested variable environments
struct Scope<'a> {
    env: &'a BTreeMap<String, String>,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    fn lookup(&self, name: &str) -> Option<&'a str> {
        match self.env.get(name) {
            Some(value) => Some(value.as_str()),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }
}

/// Compiles material scripts into a [`MaterialSystem`]
///
/// One compiler holds per-compile state such as the import cache, so each
/// thread compiling scripts needs its own instance.
pub struct ScriptCompiler {
    config: CompilerConfig,
    environment: BTreeMap<String, String>,
    loader: Option<Box<dyn ScriptLoader>>,
    diagnostics: Diagnostics,
    group: String,
    imports: BTreeMap<String, Vec<AbstractNode>>,
    import_requests: BTreeMap<String, Vec<String>>,
    import_table: Vec<ObjectNode>,
    importing: Vec<String>,
}

impl std::fmt::Debug for ScriptCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptCompiler")
            .field("config", &self.config)
            .field("environment", &self.environment)
            .field("loader", &self.loader.is_some())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

impl Default for ScriptCompiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

impl ScriptCompiler {
    /// Create a compiler with a policy
    pub fn new(config: CompilerConfig) -> Self {
        let environment = config
            .global_variables
            .iter()
            .map(|(name, value)| (strip_sigil(name).to_string(), value.clone()))
            .collect();
        Self {
            config,
            environment,
            loader: None,
            diagnostics: Diagnostics::default(),
            group: String::new(),
            imports: BTreeMap::new(),
            import_requests: BTreeMap::new(),
            import_table: Vec::new(),
            importing: Vec::new(),
        }
    }

    /// Compiler policy
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Install the collaborator used to fetch imported scripts
    pub fn set_loader(&mut self, loader: impl ScriptLoader + 'static) {
        self.loader = Some(Box::new(loader));
    }

    /// Install a listener for diagnostics and import requests
    pub fn set_listener(&mut self, listener: impl CompilerListener + 'static) {
        self.diagnostics.set_listener(Some(Box::new(listener)));
    }

    /// Remove the installed listener
    pub fn clear_listener(&mut self) {
        self.diagnostics.set_listener(None);
    }

    /// Define a global variable, with or without the leading `$`
    pub fn define_variable(&mut self, name: &str, value: impl Into<String>) {
        self.environment.insert(strip_sigil(name).to_string(), value.into());
    }

    /// Diagnostics of the last compile
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Move the diagnostics of the last compile out of the compiler
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        self.diagnostics.take()
    }

    /// Compile one script into the material system
    ///
    /// Returns true when no errors were recorded. Warnings do not fail a
    /// compile.
    pub fn compile(&mut self, text: &str, source: &str, group: &str, system: &mut MaterialSystem) -> bool {
        self.diagnostics.clear();
        self.imports.clear();
        self.import_requests.clear();
        self.import_table.clear();
        self.importing.clear();
        self.group = group.to_string();

        log::debug!("Compiling script '{source}' in group '{group}'");
        let Some(ast) = self.front_end(text, source) else {
            return false;
        };

        let mut nodes = ast.nodes;
        let mut env = self.environment.clone();
        env.extend(ast.variables);

        self.importing.push(source.to_string());
        self.process_imports(&mut nodes, &mut env);
        self.importing.pop();
        self.process_objects(&mut nodes);
        self.process_variables(&mut nodes, &env);

        let mut translator = Translator::new(&self.config, group, &mut self.diagnostics);
        for node in &nodes {
            if let AbstractNode::Object(object) = node {
                translate_object(&mut translator, system, object);
            }
        }
        system.materials.process_pending_updates();

        let errors = self.diagnostics.error_count();
        if errors == 0 {
            log::info!("Compiled script '{source}'");
        } else {
            log::warn!("Script '{source}' compiled with {errors} error(s)");
        }
        errors == 0
    }

    fn front_end(&mut self, text: &str, source: &str) -> Option<Ast> {
        match tokenize(text, source).and_then(|tokens| parse(&tokens, source)) {
            Ok(cst) => Some(build(cst, &mut self.diagnostics)),
            Err(err) => {
                self.diagnostics.push(CompileError::from(err));
                None
            }
        }
    }

    fn open_import(&mut self, source: &str) -> Option<String> {
        if let Some(text) = self.diagnostics.listener_mut().and_then(|l| l.import_file(source)) {
            return Some(text);
        }
        let loader = self.loader.as_ref()?;
        match loader.open_script(source, &self.group) {
            Ok(text) => Some(text),
            Err(err) => {
                log::debug!("Import of '{source}' failed: {err}");
                None
            }
        }
    }

    /// Remove import nodes, load each distinct source once and fill the import table
    fn process_imports(&mut self, nodes: &mut Vec<AbstractNode>, env: &mut BTreeMap<String, String>) {
        let (imports, rest): (Vec<_>, Vec<_>) = std::mem::take(nodes)
            .into_iter()
            .partition(|node| matches!(node, AbstractNode::Import(_)));
        *nodes = rest;

        for node in imports {
            let AbstractNode::Import(import) = node else {
                continue;
            };
            if self.importing.contains(&import.source) {
                log::debug!("Skipping circular import of '{}'", import.source);
                continue;
            }

            if !self.imports.contains_key(&import.source) {
                let Some(text) = self.open_import(&import.source) else {
                    self.diagnostics.error(
                        ErrorCode::ReferenceToNonExistingObject,
                        &import.location,
                        import.source.clone(),
                    );
                    continue;
                };
                let mut imported = Vec::new();
                if let Some(ast) = self.front_end(&text, &import.source) {
                    imported = ast.nodes;
                    for (name, value) in ast.variables {
                        env.entry(name).or_insert(value);
                    }
                    self.importing.push(import.source.clone());
                    self.process_imports(&mut imported, env);
                    self.importing.pop();
                    self.process_objects(&mut imported);
                }
                self.imports.insert(import.source.clone(), imported);
            }

            let requests = self.import_requests.entry(import.source).or_default();
            if import.target == "*" {
                requests.clear();
                requests.push(import.target);
            } else if !requests.iter().any(|target| target == "*") && !requests.contains(&import.target) {
                requests.push(import.target);
            }
        }

        self.import_table.clear();
        for (source, targets) in &self.import_requests {
            let Some(imported) = self.imports.get(source) else {
                continue;
            };
            let objects = imported.iter().filter_map(AbstractNode::as_object);
            if targets.iter().any(|target| target == "*") {
                self.import_table.extend(objects.cloned());
            } else {
                self.import_table
                    .extend(objects.filter(|object| targets.contains(&object.name)).cloned());
            }
        }
    }

    /// Resolve inheritance for every object in a top-level list
    fn process_objects(&mut self, nodes: &mut Vec<AbstractNode>) {
        let mut stack = Vec::new();
        for index in 0..nodes.len() {
            self.resolve_top(nodes, index, &mut stack);
        }
    }

    fn resolve_top(&mut self, nodes: &mut Vec<AbstractNode>, index: usize, stack: &mut Vec<String>) {
        let placeholder = AbstractNode::Atom(AtomNode::new(String::new(), false, nodes[index].location().clone()));
        let mut node = std::mem::replace(&mut nodes[index], placeholder);
        if let AbstractNode::Object(object) = &mut node {
            stack.push(object.name.clone());
            self.resolve_object(object, nodes, stack);
            stack.pop();
        }
        nodes[index] = node;
    }

    fn resolve_object(&mut self, object: &mut ObjectNode, top: &mut Vec<AbstractNode>, stack: &mut Vec<String>) {
        if !object.base_resolved {
            object.base_resolved = true;
            if let Some(base) = object.base.clone() {
                if let Some(source) = self.locate_base(&base, top, stack, &object.location) {
                    overlay(object, &source);
                }
            }
        }
        for child in object.children.iter_mut() {
            if let AbstractNode::Object(child) = child {
                self.resolve_object(child, top, stack);
            }
        }
    }

    /// Find a base among top-level objects first, then in the import table
    fn locate_base(
        &mut self,
        base: &str,
        top: &mut Vec<AbstractNode>,
        stack: &mut Vec<String>,
        location: &Location,
    ) -> Option<ObjectNode> {
        if stack.iter().any(|name| name == base) {
            self.diagnostics.error(
                ErrorCode::CircularInheritance,
                location,
                format!("'{base}' inherits from itself"),
            );
            return None;
        }
        let sibling = top
            .iter()
            .position(|node| node.as_object().is_some_and(|object| object.name == base));
        if let Some(index) = sibling {
            self.resolve_top(top, index, stack);
            return top[index].as_object().cloned();
        }
        if let Some(imported) = self.import_table.iter().rev().find(|object| object.name == base) {
            return Some(imported.clone());
        }
        self.diagnostics
            .error(ErrorCode::ObjectBaseNotFound, location, base.to_string());
        None
    }

    /// Expand variable references in every non-abstract object
    fn process_variables(&mut self, nodes: &mut [AbstractNode], env: &BTreeMap<String, String>) {
        let root = Scope { env, parent: None };
        for node in nodes.iter_mut() {
            if let AbstractNode::Object(object) = node {
                if !object.is_abstract {
                    self.expand_object(object, &root);
                }
            }
        }
    }

    fn expand_object(&mut self, object: &mut ObjectNode, parent: &Scope<'_>) {
        let env = std::mem::take(&mut object.env);
        let scope = Scope {
            env: &env,
            parent: Some(parent),
        };

        object.values = self.expand_values(std::mem::take(&mut object.values), &scope);

        let children = std::mem::take(&mut object.children);
        let mut expanded = Vec::with_capacity(children.len());
        for child in children {
            match child {
                AbstractNode::Object(mut child) => {
                    self.expand_object(&mut child, &scope);
                    expanded.push(AbstractNode::Object(child));
                }
                AbstractNode::Property(mut property) => {
                    property.values = self.expand_values(std::mem::take(&mut property.values), &scope);
                    expanded.push(AbstractNode::Property(property));
                }
                AbstractNode::VariableAccess(access) => self.expand_access(access, &scope, 0, &mut expanded),
                other => expanded.push(other),
            }
        }
        object.children = expanded;
        object.env = env;
    }

    fn expand_values(&mut self, values: Vec<AbstractNode>, scope: &Scope<'_>) -> Vec<AbstractNode> {
        let mut expanded = Vec::with_capacity(values.len());
        for value in values {
            match value {
                AbstractNode::VariableAccess(access) => self.expand_access(access, scope, 0, &mut expanded),
                other => expanded.push(other),
            }
        }
        expanded
    }

    /// Replace a reference with its re-parsed value
    fn expand_access(
        &mut self,
        access: VariableAccessNode,
        scope: &Scope<'_>,
        depth: usize,
        out: &mut Vec<AbstractNode>,
    ) {
        if depth >= self.config.max_variable_depth {
            self.diagnostics.error(
                ErrorCode::VariableNestingTooDeep,
                &access.location,
                format!("${}", access.name),
            );
            return;
        }
        let Some(value) = scope.lookup(&access.name) else {
            self.diagnostics
                .error(ErrorCode::UndefinedVariable, &access.location, format!("${}", access.name));
            return;
        };

        let file = access.location.file.to_string();
        let line = access.location.line;
        match tokenize(value, &file).and_then(|tokens| parse_chunk(&tokens, &file, line)) {
            Ok(cst) => {
                for node in build_values(cst) {
                    match node {
                        AbstractNode::VariableAccess(inner) => self.expand_access(inner, scope, depth + 1, out),
                        other => out.push(other),
                    }
                }
            }
            Err(err) => self.diagnostics.push(CompileError::from(err)),
        }
    }
}

fn strip_sigil(name: &str) -> &str {
    name.strip_prefix('$').unwrap_or(name)
}

/// Merge a resolved base object into a derived one
///
/// Source objects pair with destination objects of the same class. A named
/// destination object takes the source object of that class and name; the
/// unnamed ones fall back to positional pairing among the remaining objects
/// of their class. Paired objects merge recursively. Unpaired source objects are cloned in after the last
/// paired object, and source properties go to the front so destination
/// properties are applied last.
fn overlay(dest: &mut ObjectNode, src: &ObjectNode) {
    for (name, value) in &src.env {
        dest.env.entry(name.clone()).or_insert_with(|| value.clone());
    }

    let pairs = pair_objects(dest, src);
    let mut position: Vec<usize> = (0..dest.children.len()).collect();
    let mut front = 0;
    let mut cursor = 0;

    for (index, child) in src.children.iter().enumerate() {
        if let Some(&target) = pairs.get(&index) {
            let at = position[target];
            if let (Some(src_object), Some(dest_object)) = (child.as_object(), dest.children[at].as_object_mut()) {
                overlay(dest_object, src_object);
            }
            cursor = cursor.max(at + 1);
            continue;
        }

        let at = if child.as_object().is_some() { cursor } else { front };
        dest.children.insert(at, child.clone());
        for p in position.iter_mut().filter(|p| **p >= at) {
            *p += 1;
        }
        if child.as_object().is_some() {
            cursor += 1;
        } else {
            front += 1;
            cursor += 1;
        }
    }
}

/// Map source child indices to the destination child they overlay
fn pair_objects(dest: &ObjectNode, src: &ObjectNode) -> BTreeMap<usize, usize> {
    let sources: Vec<(usize, &ObjectNode)> = src
        .children
        .iter()
        .enumerate()
        .filter_map(|(index, child)| child.as_object().map(|object| (index, object)))
        .collect();
    let mut claimed = vec![false; src.children.len()];
    let mut paired = vec![false; dest.children.len()];
    let mut pairs = BTreeMap::new();

    for (d, child) in dest.children.iter().enumerate() {
        let Some(object) = child.as_object().filter(|object| !object.name.is_empty()) else {
            continue;
        };
        let found = sources
            .iter()
            .find(|(s, source)| !claimed[*s] && source.cls == object.cls && source.name == object.name);
        if let Some((s, _)) = found {
            claimed[*s] = true;
            paired[d] = true;
            pairs.insert(*s, d);
        }
    }

    for (d, child) in dest.children.iter().enumerate() {
        let Some(object) = child.as_object() else {
            continue;
        };
        if paired[d] {
            continue;
        }
        let found = sources.iter().find(|(s, source)| {
            !claimed[*s]
                && source.cls == object.cls
                && (source.name.is_empty() || object.name.is_empty() || source.name == object.name)
        });
        if let Some((s, _)) = found {
            claimed[*s] = true;
            pairs.insert(*s, d);
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::foundation::math::ColourValue;
    use crate::resources::MemoryLoader;
    use crate::script::keywords::Keyword;

    fn pass_ambient(system: &MaterialSystem, material: &str, pass: usize) -> ColourValue {
        let material = system.materials.find(material).unwrap();
        let key = material.technique(0).unwrap().pass(pass).unwrap();
        system.materials.passes().get(key).unwrap().ambient()
    }

    fn run(compiler: &mut ScriptCompiler, text: &str) -> (bool, MaterialSystem) {
        let mut system = MaterialSystem::default();
        let ok = compiler.compile(text, "main.material", "General", &mut system);
        (ok, system)
    }

    fn codes(compiler: &ScriptCompiler) -> Vec<ErrorCode> {
        compiler.diagnostics().entries().iter().map(|e| e.code).collect()
    }

    const BASE: &str = "material B\n{\n technique\n {\n  pass\n  {\n   ambient 0 0 1\n  }\n  pass\n  {\n   ambient 1 0 0\n  }\n }\n}\n";

    #[test]
    fn test_inherited_pass_is_kept() {
        let script = format!("{BASE}material A : B\n{{\n technique\n {{\n  pass\n  {{\n   diffuse 1 1 1\n  }}\n }}\n}}\n");
        let mut compiler = ScriptCompiler::default();
        let (ok, system) = run(&mut compiler, &script);
        assert!(ok, "{:?}", compiler.diagnostics());
        let technique = system.materials.find("A").unwrap().technique(0).unwrap();
        assert_eq!(technique.num_passes(), 2);
        assert_eq!(pass_ambient(&system, "A", 0), ColourValue::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(pass_ambient(&system, "A", 1), ColourValue::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_derived_properties_win() {
        let script = format!(
            "{BASE}material A : B\n{{\n technique\n {{\n  pass\n  {{\n  }}\n  pass\n  {{\n   ambient 0 1 0\n  }}\n }}\n}}\n"
        );
        let mut compiler = ScriptCompiler::default();
        let (ok, system) = run(&mut compiler, &script);
        assert!(ok);
        assert_eq!(pass_ambient(&system, "A", 1), ColourValue::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(pass_ambient(&system, "B", 1), ColourValue::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_base_declared_after_derived() {
        let script = format!("material A : B\n{{\n}}\n{BASE}");
        let mut compiler = ScriptCompiler::default();
        let (ok, system) = run(&mut compiler, &script);
        assert!(ok);
        assert_eq!(system.materials.find("A").unwrap().technique(0).unwrap().num_passes(), 2);
    }

    fn named_pass(name: &str) -> AbstractNode {
        let mut pass = ObjectNode::new("pass", Location::new("t".into(), 1));
        pass.name = name.to_string();
        AbstractNode::Object(pass)
    }

    #[test]
    fn test_named_objects_pair_by_name() {
        let mut dest = ObjectNode::new("technique", Location::new("t".into(), 1));
        let mut src = dest.clone();
        dest.children.push(named_pass("Second"));
        src.children.push(named_pass("First"));
        src.children.push(named_pass("Second"));

        let pairs = pair_objects(&dest, &src);
        assert_eq!(pairs.get(&1), Some(&0));
        assert_eq!(pairs.get(&0), None);

        overlay(&mut dest, &src);
        let names: Vec<_> = dest.objects().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn test_unnamed_objects_pair_by_position_after_names() {
        let mut dest = ObjectNode::new("technique", Location::new("t".into(), 1));
        let mut src = dest.clone();
        dest.children.push(named_pass("Second"));
        dest.children.push(named_pass(""));
        src.children.push(named_pass("First"));
        src.children.push(named_pass("Second"));

        let pairs = pair_objects(&dest, &src);
        assert_eq!(pairs.get(&1), Some(&0));
        assert_eq!(pairs.get(&0), Some(&1));
    }

    #[test]
    fn test_inherited_properties_precede_own() {
        let location = Location::new("t".into(), 1);
        let mut dest = ObjectNode::new("pass", location.clone());
        dest.children
            .push(AbstractNode::Property(crate::script::ast::PropertyNode::new("ambient", location.clone())));
        let mut src = ObjectNode::new("pass", location.clone());
        src.children
            .push(AbstractNode::Property(crate::script::ast::PropertyNode::new("diffuse", location.clone())));
        src.env.insert("x".into(), "1".into());
        dest.env.insert("x".into(), "2".into());

        overlay(&mut dest, &src);
        let order: Vec<_> = dest.properties().map(|p| p.id).collect();
        assert_eq!(order, [Keyword::Diffuse, Keyword::Ambient]);
        assert_eq!(dest.env["x"], "2");
    }

    #[test]
    fn test_circular_inheritance() {
        let mut compiler = ScriptCompiler::default();
        let (ok, _) = run(&mut compiler, "material A : B\n{\n}\nmaterial B : A\n{\n}\n");
        assert!(!ok);
        assert!(codes(&compiler).contains(&ErrorCode::CircularInheritance));
    }

    #[test]
    fn test_base_not_found() {
        let mut compiler = ScriptCompiler::default();
        let (ok, system) = run(&mut compiler, "material A : Missing\n{\n}\n");
        assert!(!ok);
        assert_eq!(codes(&compiler), [ErrorCode::ObjectBaseNotFound]);
        assert!(system.materials.find("A").is_some());
    }

    #[test]
    fn test_abstract_base_is_not_translated() {
        let mut compiler = ScriptCompiler::default();
        let (ok, system) = run(
            &mut compiler,
            "abstract pass Lit\n{\n ambient 1 0 0\n}\nmaterial M\n{\n technique\n {\n  pass : Lit\n  {\n  }\n }\n}\n",
        );
        assert!(ok, "{:?}", compiler.diagnostics());
        assert!(system.materials.find("Lit").is_none());
        assert_eq!(pass_ambient(&system, "M", 0), ColourValue::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_import_named_object() {
        let mut compiler = ScriptCompiler::default();
        compiler.set_loader(MemoryLoader::new().with_script("base.material", BASE));
        let (ok, system) = run(&mut compiler, "import B from \"base.material\"\nmaterial A : B\n{\n}\n");
        assert!(ok, "{:?}", compiler.diagnostics());
        assert!(system.materials.find("B").is_none());
        assert_eq!(pass_ambient(&system, "A", 1), ColourValue::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_import_wildcard_and_circular_source() {
        let mut compiler = ScriptCompiler::default();
        let shared = format!("import * from main.material\n{BASE}");
        compiler.set_loader(
            MemoryLoader::new()
                .with_script("shared.material", shared)
                .with_script("main.material", "material Unused\n{\n}\n"),
        );
        let (ok, system) = run(
            &mut compiler,
            "import B from shared.material\nimport * from shared.material\nmaterial A : B\n{\n}\n",
        );
        assert!(ok, "{:?}", compiler.diagnostics());
        assert_eq!(system.materials.find("A").unwrap().technique(0).unwrap().num_passes(), 2);
    }

    #[test]
    fn test_missing_import() {
        let mut compiler = ScriptCompiler::default();
        compiler.set_loader(MemoryLoader::new());
        let (ok, _) = run(&mut compiler, "import * from nowhere.material\nmaterial A\n{\n}\n");
        assert!(!ok);
        assert_eq!(codes(&compiler), [ErrorCode::ReferenceToNonExistingObject]);
        assert_eq!(compiler.diagnostics().entries()[0].message, "nowhere.material");
    }

    struct Recorder {
        seen: Rc<RefCell<Vec<ErrorCode>>>,
    }

    impl CompilerListener for Recorder {
        fn error_raised(&mut self, error: &CompileError) {
            self.seen.borrow_mut().push(error.code);
        }

        fn import_file(&mut self, source: &str) -> Option<String> {
            (source == "listener.material").then(|| BASE.to_string())
        }
    }

    #[test]
    fn test_listener_supplies_imports_and_sees_errors() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut compiler = ScriptCompiler::default();
        compiler.set_listener(Recorder { seen: Rc::clone(&seen) });
        let (ok, system) = run(
            &mut compiler,
            "import B from listener.material\nmaterial A : B\n{\n}\nmaterial C : Nope\n{\n}\n",
        );
        assert!(!ok);
        assert!(system.materials.find("A").is_some());
        assert_eq!(*seen.borrow(), [ErrorCode::ObjectBaseNotFound]);
    }

    #[test]
    fn test_variable_expansion_matches_inline_values() {
        let mut compiler = ScriptCompiler::default();
        let (ok, system) = run(
            &mut compiler,
            "set $c 1 0 0\nmaterial M\n{\n technique\n {\n  pass\n  {\n   ambient $c\n  }\n }\n}\n",
        );
        assert!(ok, "{:?}", compiler.diagnostics());
        assert_eq!(pass_ambient(&system, "M", 0), ColourValue::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_nested_scope_shadows_outer() {
        let mut compiler = ScriptCompiler::default();
        compiler.define_variable("$c", "0 0 1");
        let (ok, system) = run(
            &mut compiler,
            "material M\n{\n set $c 0 1 0\n technique\n {\n  pass\n  {\n   ambient $c\n  }\n }\n}\nmaterial N\n{\n technique\n {\n  pass\n  {\n   ambient $c\n  }\n }\n}\n",
        );
        assert!(ok, "{:?}", compiler.diagnostics());
        assert_eq!(pass_ambient(&system, "M", 0), ColourValue::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(pass_ambient(&system, "N", 0), ColourValue::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_undefined_variable_is_dropped() {
        let mut compiler = ScriptCompiler::default();
        let (ok, _) = run(
            &mut compiler,
            "material M\n{\n technique\n {\n  pass\n  {\n   ambient $missing\n  }\n }\n}\n",
        );
        assert!(!ok);
        let codes = codes(&compiler);
        assert_eq!(codes.iter().filter(|c| **c == ErrorCode::UndefinedVariable).count(), 1);
        assert_eq!(compiler.diagnostics().error_count(), 2);
    }

    #[test]
    fn test_self_referencing_variable_stops_at_depth_limit() {
        let mut compiler = ScriptCompiler::new(CompilerConfig {
            max_variable_depth: 4,
            ..CompilerConfig::default()
        });
        let (ok, _) = run(
            &mut compiler,
            "set $a $a\nmaterial M\n{\n lod_distances $a\n}\n",
        );
        assert!(!ok);
        assert!(codes(&compiler).contains(&ErrorCode::VariableNestingTooDeep));
    }

    #[test]
    fn test_syntax_error_fails_compile() {
        let mut compiler = ScriptCompiler::default();
        let (ok, system) = run(&mut compiler, "material M\n{\n ambient \"open\n}\n");
        assert!(!ok);
        assert_eq!(codes(&compiler), [ErrorCode::SyntaxError]);
        assert!(system.materials.is_empty());
    }

    #[test]
    fn test_take_diagnostics_empties_compiler() {
        let mut compiler = ScriptCompiler::default();
        run(&mut compiler, "material A : Missing\n{\n}\n");
        let taken = compiler.take_diagnostics();
        assert_eq!(taken.error_count(), 1);
        assert!(compiler.diagnostics().entries().is_empty());
    }
}
