use super::keys::TypedKey;
use crate::error::{ReconcileError, Result};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use tracing::debug;

/// Pipeline data map for passing data between nodes
pub struct PipeMap {
    data: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl PipeMap {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Insert a value with a typed key
    pub fn insert_typed<T: Any + Send + Sync>(&mut self, key: TypedKey<T>, value: T) {
        self.data.insert(key.name().to_string(), Box::new(value));
    }

    /// Get a value with a typed key
    pub fn get_typed<T: Any + Send + Sync>(&self, key: TypedKey<T>) -> Option<&T> {
        self.data
            .get(key.name())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Move a value out of the map. A value of another type under the same
    /// name is left in place.
    pub fn take_typed<T: Any + Send + Sync>(&mut self, key: TypedKey<T>) -> Option<T> {
        self.get_typed(key)?;
        self.data
            .remove(key.name())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

impl Default for PipeMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Pipeline node trait
#[async_trait]
pub trait PipeNode: Send + Sync {
    fn name(&self) -> String;

    /// Required input keys; a trailing '?' marks an input optional
    fn input(&self) -> Vec<String>;

    fn output(&self) -> Vec<String>;

    async fn process(&self, data: PipeMap) -> Result<PipeMap>;

    fn validate_input(&self, data: &PipeMap) -> Result<()> {
        for input in self.input() {
            if input.ends_with('?') {
                continue;
            }
            if !data.contains_key(&input) {
                return Err(ReconcileError::MissingInput {
                    node: self.name(),
                    required: input,
                });
            }
        }
        Ok(())
    }

    fn validate_output(&self, data: &PipeMap) -> Result<()> {
        // Output does not support optional syntax, all outputs are required
        for output in self.output() {
            if !data.contains_key(&output) {
                return Err(ReconcileError::MissingOutput {
                    node: self.name(),
                    required: output,
                });
            }
        }
        Ok(())
    }
}

/// Pipeline - runs nodes strictly in order
pub struct Pipeline {
    name: String,
    nodes: Vec<Box<dyn PipeNode>>,
    external_inputs: Vec<String>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            external_inputs: Vec::new(),
        }
    }

    /// Set external inputs that will be provided via initial PipeMap
    pub fn with_external_inputs(mut self, inputs: Vec<String>) -> Self {
        self.external_inputs = inputs;
        self
    }

    /// Append a node, checking its required inputs are produced upstream
    pub fn add_node(mut self, node: Box<dyn PipeNode>) -> Result<Self> {
        let mut available: Vec<String> = self.external_inputs.clone();
        for existing in &self.nodes {
            available.extend(existing.output());
        }

        let missing: Vec<String> = node
            .input()
            .into_iter()
            .filter(|input| !input.ends_with('?') && !available.contains(input))
            .collect();

        if !missing.is_empty() {
            return Err(ReconcileError::pipeline(format!(
                "Node '{}' requires inputs {:?} that are not available. Available: {:?}",
                node.name(),
                missing,
                available
            )));
        }

        debug!(
            "Adding node '{}' to pipeline '{}'. Inputs: {:?}",
            node.name(),
            self.name,
            node.input()
        );
        self.nodes.push(node);
        Ok(self)
    }

    /// Run every node; an error is tagged with the node that raised it
    pub async fn execute(&self, mut data: PipeMap) -> Result<PipeMap> {
        for node in &self.nodes {
            let name = node.name();
            debug!("Processing node '{}'", name);

            node.validate_input(&data)
                .map_err(|e| ReconcileError::stage(&name, e))?;
            data = node
                .process(data)
                .await
                .map_err(|e| ReconcileError::stage(&name, e))?;
            node.validate_output(&data)
                .map_err(|e| ReconcileError::stage(&name, e))?;
        }

        debug!("Pipeline '{}' executed successfully", self.name);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNT: TypedKey<i32> = TypedKey::new("count");
    const WRONG: TypedKey<String> = TypedKey::new("count");
    const DOUBLED: TypedKey<i32> = TypedKey::new("doubled");

    struct Doubler;

    #[async_trait]
    impl PipeNode for Doubler {
        fn name(&self) -> String {
            "Doubler".to_string()
        }

        fn input(&self) -> Vec<String> {
            vec![COUNT.name().to_string()]
        }

        fn output(&self) -> Vec<String> {
            vec![DOUBLED.name().to_string()]
        }

        async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
            let count = data.take_typed(COUNT).ok_or("Missing count input")?;
            data.insert_typed(DOUBLED, count * 2);
            Ok(data)
        }
    }

    struct Failing;

    #[async_trait]
    impl PipeNode for Failing {
        fn name(&self) -> String {
            "Failing".to_string()
        }

        fn input(&self) -> Vec<String> {
            vec!["doubled".to_string(), "extra?".to_string()]
        }

        fn output(&self) -> Vec<String> {
            vec![]
        }

        async fn process(&self, _data: PipeMap) -> Result<PipeMap> {
            Err("boom".into())
        }
    }

    #[test]
    fn test_typed_access() {
        let mut data = PipeMap::new();
        data.insert_typed(COUNT, 21);

        assert_eq!(data.get_typed(COUNT), Some(&21));
        assert_eq!(data.get_typed(WRONG), None);
        assert_eq!(data.take_typed(WRONG), None);
        assert!(data.contains_key("count"));

        assert_eq!(data.take_typed(COUNT), Some(21));
        assert!(!data.contains_key("count"));
    }

    #[tokio::test]
    async fn test_execute_in_order() {
        let pipeline = Pipeline::new("test")
            .with_external_inputs(vec!["count".to_string()])
            .add_node(Box::new(Doubler))
            .unwrap();

        let mut data = PipeMap::new();
        data.insert_typed(COUNT, 21);
        let data = pipeline.execute(data).await.unwrap();
        assert_eq!(data.get_typed(DOUBLED), Some(&42));
    }

    #[test]
    fn test_add_node_checks_wiring() {
        let result = Pipeline::new("test").add_node(Box::new(Doubler));
        assert!(matches!(result, Err(ReconcileError::Pipeline(_))));
    }

    #[tokio::test]
    async fn test_error_names_stage() {
        let pipeline = Pipeline::new("test")
            .with_external_inputs(vec!["count".to_string()])
            .add_node(Box::new(Doubler))
            .unwrap()
            .add_node(Box::new(Failing))
            .unwrap();

        let mut data = PipeMap::new();
        data.insert_typed(COUNT, 1);
        let err = pipeline.execute(data).await.err().unwrap();

        assert_eq!(err.stage_name(), Some("Failing"));
        assert_eq!(err.to_string(), "Failing: boom");
    }

    #[tokio::test]
    async fn test_missing_input_at_runtime() {
        let pipeline = Pipeline::new("test")
            .with_external_inputs(vec!["count".to_string()])
            .add_node(Box::new(Doubler))
            .unwrap();

        let err = pipeline.execute(PipeMap::new()).await.err().unwrap();
        assert_eq!(err.stage_name(), Some("Doubler"));
        assert!(err.to_string().contains("Missing required input 'count'"));
    }
}
