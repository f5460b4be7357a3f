use super::methods::{MethodSet, arg, encode, fail, integer, string_arg};
use super::query::Query;
use super::value::{from_cel, to_cel};
use crate::{HashMap, Result};
use crate::graph::Graph;
use crate::model::StatsDocument;
use cel_interpreter::extractors::Arguments;
use cel_interpreter::{Context, ExecutionError, Program, ResolveResult, Value};
use core::fmt::{self, Debug, Formatter};
use ohno::{IntoAppError, app_err};
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;

const LOG_TARGET: &str = "   query";

/// Module and chunk graphs of one compilation.
struct CompilationGraphs {
    modules: Graph<String>,
    chunks: Graph<String>,
}

type Graphs = Arc<HashMap<String, CompilationGraphs>>;

/// Evaluates queries against a fixed set of documents.
pub struct QueryEngine {
    context: Context<'static>,
    files: Value,
}

impl Debug for QueryEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEngine").finish_non_exhaustive()
    }
}

impl QueryEngine {
    /// Build an engine over `files`, with `overrides` layered on top of the built-in methods.
    ///
    /// # Errors
    /// Returns an error if the documents cannot be serialized.
    pub fn new(files: &[StatsDocument], overrides: MethodSet) -> Result<Self> {
        let files_json = serde_json::to_value(files).into_app_err("could not serialize documents")?;
        let compilations: Vec<&StatsDocument> = files.iter().flat_map(StatsDocument::compilations).collect();
        let compilations_json = serde_json::to_value(&compilations).into_app_err("could not serialize compilations")?;

        let mut graphs = HashMap::default();
        for compilation in &compilations {
            let _ = graphs
                .entry(compilation.id().to_string())
                .or_insert_with(|| CompilationGraphs {
                    modules: compilation.module_graph(),
                    chunks: compilation.chunk_graph(),
                });
        }

        let methods = MethodSet::builtin().merge(graph_methods(Arc::new(graphs))).merge(overrides);
        log::debug!(target: LOG_TARGET, "Registering {} query methods", methods.len());

        let files = to_cel(&files_json);
        let mut context = Context::default();
        context.add_variable_from_value("files", files.clone());
        context.add_variable_from_value("compilations", to_cel(&compilations_json));

        for (name, method) in methods.iter() {
            let method = Arc::clone(method);
            context.add_function(name, move |Arguments(args): Arguments| method(args.as_slice()));
        }

        Ok(Self { context, files })
    }

    /// Compile and evaluate `expr`. `data` defaults to the full list of files.
    ///
    /// # Errors
    /// Returns an error if the expression does not parse or fails to evaluate.
    pub fn query(&self, expr: &str, data: Option<&JsonValue>) -> Result<JsonValue> {
        let program = Program::compile(expr).map_err(|e| app_err!("could not parse query: {e}"))?;
        self.evaluate(&program, data)
            .into_app_err_with(|| format!("could not evaluate query '{expr}'"))
    }

    /// Evaluate a pre-compiled query.
    ///
    /// # Errors
    /// Returns an error if the query fails to evaluate.
    pub fn execute(&self, query: &Query, data: Option<&JsonValue>) -> Result<JsonValue> {
        self.evaluate(query.program(), data)
            .into_app_err_with(|| format!("could not evaluate query '{}'", query.name()))
    }

    fn evaluate(&self, program: &Program, data: Option<&JsonValue>) -> Result<JsonValue, ExecutionError> {
        let mut scope = self.context.new_inner_scope();
        scope.add_variable_from_value("data", data.map_or_else(|| self.files.clone(), to_cel));
        program.execute(&scope).map(|value| from_cel(&value))
    }
}

fn graph_methods(graphs: Graphs) -> MethodSet {
    let nodes = Arc::clone(&graphs);

    MethodSet::new()
        .with("graph_getNode", move |args| {
            let (Some(compilation), Some(id)) = (string_arg(args, 0), string_arg(args, 1)) else {
                return Ok(Value::Null);
            };
            let Some(graph) = nodes.get(&compilation).map(|graphs| &graphs.modules) else {
                return Ok(Value::Null);
            };
            let Some(node) = graph.get_node(&id) else {
                return Ok(Value::Null);
            };

            let dependencies: Vec<&str> = graph.outgoing(node).map(|n| n.id()).collect();
            let dependents: Vec<&str> = graph.incoming(node).map(|n| n.id()).collect();
            Ok(to_cel(&json!({
                "id": node.id(),
                "name": node.data(),
                "dependencies": dependencies,
                "dependents": dependents,
            })))
        })
        .with("graph_getPaths", paths_method("graph_getPaths", Arc::clone(&graphs), |graphs| &graphs.modules))
        .with("graph_getChunkPaths", paths_method("graph_getChunkPaths", graphs, |graphs| &graphs.chunks))
}

/// `name(compilationId, from, to, max?)`: simple paths through one graph of a compilation.
fn paths_method(
    name: &'static str,
    graphs: Graphs,
    select: fn(&CompilationGraphs) -> &Graph<String>,
) -> impl Fn(&[Value]) -> ResolveResult + Send + Sync + 'static {
    move |args| {
        let (Some(compilation), Some(from), Some(to)) = (string_arg(args, 0), string_arg(args, 1), string_arg(args, 2)) else {
            return Ok(Value::Null);
        };
        let max = match arg(args, 3) {
            Value::Null => None,
            _ => Some(usize::try_from(integer(name, args, 3)?).map_err(|e| fail(name, e))?),
        };

        match graphs.get(&compilation).and_then(|graphs| select(graphs).find_paths(&from, &to, max)) {
            Some(solution) => encode(name, &solution),
            None => Ok(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_value;

    fn documents() -> Vec<StatsDocument> {
        let doc = normalize_value(
            json!({
                "version": "5.88.0",
                "hash": "h1",
                "modules": [
                    {"identifier": "index", "name": "./src/index.js", "size": 100, "chunks": [1]},
                    {"identifier": "util", "name": "./src/util.js", "size": 40, "chunks": [1],
                        "reasons": [{"moduleIdentifier": "index"}]},
                    {"identifier": "deep", "name": "./src/deep.js", "size": 5, "chunks": [1],
                        "reasons": [{"moduleIdentifier": "util"}, {"moduleIdentifier": "index"}]}
                ],
                "chunks": [
                    {"id": 1, "names": ["main"], "files": ["main.js"], "children": [2]},
                    {"id": 2, "names": ["lazy"], "parents": [1], "children": [1]}
                ],
                "assets": [{"name": "main.js", "size": 145, "chunks": [1]}]
            }),
            "stats.json",
            Vec::new(),
        )
        .unwrap();
        vec![doc]
    }

    fn engine() -> QueryEngine {
        QueryEngine::new(&documents(), MethodSet::new()).unwrap()
    }

    #[test]
    fn test_variables() {
        let engine = engine();
        assert_eq!(engine.query("size(files)", None).unwrap(), json!(1));
        assert_eq!(engine.query("compilations[0].id", None).unwrap(), json!("h1"));
        assert_eq!(engine.query("data[0].modules.size()", None).unwrap(), json!(3));
        assert_eq!(engine.query("data * 2", Some(&json!(21))).unwrap(), json!(42));
    }

    #[test]
    fn test_filters_and_builtins() {
        let engine = engine();
        let result = engine
            .query("files[0].modules.filter(m, m.size.raw > 10).map(m, m.name)", None)
            .unwrap();
        assert_eq!(result, json!(["./src/index.js", "./src/util.js"]));
        assert_eq!(engine.query("formatSize(files[0].assets[0].size.raw)", None).unwrap(), json!("0.14 kb"));
    }

    #[test]
    fn test_graph_methods() {
        let engine = engine();
        let node = engine.query("graph_getNode('h1', 'util')", None).unwrap();
        assert_eq!(node["dependencies"], json!(["deep"]));
        assert_eq!(node["dependents"], json!(["index"]));
        assert_eq!(engine.query("graph_getNode('h1', 'nope')", None).unwrap(), JsonValue::Null);

        let paths = engine.query("graph_getPaths('h1', 'index', 'deep')", None).unwrap();
        assert_eq!(paths["paths"].as_array().unwrap().len(), 2);
        let limited = engine.query("graph_getPaths('h1', 'index', 'deep', 1)", None).unwrap();
        assert_eq!(limited["paths"].as_array().unwrap().len(), 1);
        assert_eq!(engine.query("graph_getPaths('h1', 'deep', 'index')", None).unwrap(), JsonValue::Null);
    }

    #[test]
    fn test_chunk_paths_tolerate_cycles() {
        let engine = engine();
        assert_eq!(
            engine.query("graph_getChunkPaths('h1', '1', '2')", None).unwrap(),
            json!({"paths": [["1", "2"]]})
        );
        assert_eq!(
            engine.query("graph_getChunkPaths('h1', '2', '1')", None).unwrap(),
            json!({"paths": [["2", "1"]]})
        );
        assert_eq!(engine.query("graph_getChunkPaths('h1', '1', '9')", None).unwrap(), JsonValue::Null);
        assert_eq!(engine.query("graph_getChunkPaths('nope', '1', '2')", None).unwrap(), JsonValue::Null);
    }

    #[test]
    fn test_overrides_replace_builtins() {
        let overrides = MethodSet::new().with("formatSize", |_| Ok(Value::String(Arc::new("tiny".into()))));
        let engine = QueryEngine::new(&documents(), overrides).unwrap();
        assert_eq!(engine.query("formatSize(1)", None).unwrap(), json!("tiny"));
    }

    #[test]
    fn test_precompiled_query() {
        let engine = engine();
        let query = Query::new("count", None, "size(data)").unwrap();
        assert_eq!(engine.execute(&query, Some(&json!([1, 2, 3]))).unwrap(), json!(3));
    }

    #[test]
    fn test_errors() {
        let engine = engine();
        let _ = engine.query("files[", None).unwrap_err();
        let _ = engine.query("unknownMethod(1)", None).unwrap_err();
        let _ = engine.query("percentFrom('a', 1)", None).unwrap_err();
    }
}
