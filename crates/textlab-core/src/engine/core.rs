//! Implementación del `BatchEngine`.
//!
//! Responsable de orquestar la ejecución de tareas en orden de registro,
//! calcular fingerprints sobre el conjunto discriminador, decidir reuso de
//! cache y mantener el log de eventos. Ejecución síncrona, un solo hilo:
//! los imports de una tarea están comprometidos antes de que arranque.

use std::collections::HashMap;

use serde_json::json;
use uuid::Uuid;

use crate::artifact::{Artifact, ArtifactKind, ArtifactStore, InMemoryArtifactStore, Lookup};
use crate::constants::{DISCRIMINATORS_KEY, ENGINE_VERSION};
use crate::errors::LabError;
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use crate::hashing::hash_value;
use crate::report::{ReportContext, Table, TaskExecutionRecord};
use crate::space::{Configuration, ParameterSpace};
use crate::task::{Batch, LeafTask, SpaceSource, Task, TaskContext};

use super::ExecutionPolicy;

/// Resultado de correr un batch raíz.
#[derive(Debug)]
pub struct BatchOutcome {
    pub run_id: Uuid,
    /// Ejecuciones comprometidas (incluye las de batches anidados), una por
    /// fingerprint distinto.
    pub executions: Vec<TaskExecutionRecord>,
    /// Tablas emitidas por los reportes, en orden (batch, reporte).
    pub tables: Vec<(String, Table)>,
}

pub struct BatchEngine<E, S>
    where E: EventStore,
          S: ArtifactStore
{
    event_store: E,
    artifact_store: S,
    policy: ExecutionPolicy,
}

impl BatchEngine<InMemoryEventStore, InMemoryArtifactStore> {
    /// Engine con stores en memoria y política reuse-cached.
    pub fn new() -> Self {
        Self::new_with_stores(InMemoryEventStore::default(), InMemoryArtifactStore::new())
    }
}

impl Default for BatchEngine<InMemoryEventStore, InMemoryArtifactStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, S> BatchEngine<E, S>
    where E: EventStore,
          S: ArtifactStore
{
    pub fn new_with_stores(event_store: E, artifact_store: S) -> Self {
        Self { event_store,
               artifact_store,
               policy: ExecutionPolicy::ReuseCached }
    }

    pub fn with_policy(mut self, policy: ExecutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ExecutionPolicy {
        self.policy
    }

    pub fn artifact_store(&self) -> &S {
        &self.artifact_store
    }

    /// Eventos de una corrida (orden de append).
    pub fn events(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.event_store.list(run_id)
    }

    /// Ejecuta el batch raíz hasta completarlo. El artifact store persiste
    /// entre corridas del mismo engine: bajo reuse-cached una segunda
    /// corrida con discriminadores idénticos no vuelve a ejecutar.
    pub fn run(&mut self, batch: &Batch) -> Result<BatchOutcome, LabError> {
        let run_id = Uuid::new_v4();
        let mut records: Vec<TaskExecutionRecord> = Vec::new();
        let mut tables: Vec<(String, Table)> = Vec::new();
        let scope: HashMap<String, String> = HashMap::new();

        self.run_batch(run_id, batch, &Configuration::default(), &scope, &mut records, &mut tables)?;

        Ok(BatchOutcome { run_id, executions: records, tables })
    }

    fn run_batch(&mut self,
                 run_id: Uuid,
                 batch: &Batch,
                 outer_config: &Configuration,
                 outer_scope: &HashMap<String, String>,
                 records: &mut Vec<TaskExecutionRecord>,
                 tables: &mut Vec<(String, Table)>)
                 -> Result<(), LabError> {
        let batch_imports = self.bind_imports(batch.name(), batch.imports(), outer_scope)?;
        let space = self.resolve_space(batch, outer_config, &batch_imports)?;
        let configs = space.plan().map_err(|e| e.in_task(batch.name()))?;

        self.event_store.append_kind(run_id,
                                     RunEventKind::BatchStarted { batch: batch.name().to_string(),
                                                                  configurations: configs.len() });

        let first_record = records.len();
        for config in &configs {
            let scoped_config = outer_config.merged(config);
            let mut scope = outer_scope.clone();
            for task in &batch.tasks {
                match task {
                    Task::Leaf(leaf) => {
                        self.run_leaf(run_id, batch.name(), leaf.as_ref(), &scoped_config, &mut scope, records)?;
                    }
                    Task::Batch(inner) => {
                        // Batch anidado: tarea compuesta con discriminadores
                        // agregados; hereda el scope pero no exporta a él.
                        self.run_batch(run_id, inner, &scoped_config, &scope, records, tables)?;
                    }
                }
            }
        }

        let batch_fp = hash_value(&json!({
            "engine_version": ENGINE_VERSION,
            "batch": batch.name(),
            "executions": records[first_record..].iter().map(|r| r.execution.clone()).collect::<Vec<_>>(),
        }));

        for report in &batch.reports {
            let batch_records = records[first_record..].to_vec();
            let mut ctx = ReportContext::new(batch.name(), &batch_records, &self.artifact_store);
            let table = report.execute(&mut ctx).map_err(|e| e.in_task(batch.name()))?;
            let missing = std::mem::take(&mut ctx.missing);
            for (execution, key) in missing {
                self.event_store.append_kind(run_id, RunEventKind::ArtifactMissing { execution, key });
            }
            tables.push((format!("{}/{}", batch.name(), report.name()), table));
        }

        self.event_store.append_kind(run_id,
                                     RunEventKind::BatchCompleted { batch: batch.name().to_string(),
                                                                    fingerprint: batch_fp });
        Ok(())
    }

    fn run_leaf(&mut self,
                run_id: Uuid,
                batch_name: &str,
                task: &dyn LeafTask,
                config: &Configuration,
                scope: &mut HashMap<String, String>,
                records: &mut Vec<TaskExecutionRecord>)
                -> Result<(), LabError> {
        let discriminators = config.discriminators(&task.discriminator_keys());
        let execution = hash_value(&json!({
            "engine_version": ENGINE_VERSION,
            "task": task.name(),
            "discriminators": discriminators,
        }));

        // Los imports se resuelven siempre, incluso ante un hit de cache:
        // un import insatisfecho es un error de orden, no de datos.
        let imports = self.bind_imports(task.name(), &task.imports(), scope)?;

        if self.policy == ExecutionPolicy::ReuseCached && self.artifact_store.contains_execution(&execution) {
            self.event_store.append_kind(run_id,
                                         RunEventKind::TaskReused { batch: batch_name.to_string(),
                                                                    task: task.name().to_string(),
                                                                    execution: execution.clone() });
            scope.insert(task.name().to_string(), execution.clone());
            push_record(records, task.name(), execution, discriminators, true);
            return Ok(());
        }

        self.event_store.append_kind(run_id,
                                     RunEventKind::TaskStarted { batch: batch_name.to_string(),
                                                                 task: task.name().to_string(),
                                                                 execution: execution.clone() });

        let mut ctx = TaskContext::new(config, imports, task.output_keys());
        if let Err(error) = task.execute(&mut ctx) {
            let attributed = error.in_task(task.name());
            self.event_store.append_kind(run_id,
                                         RunEventKind::TaskFailed { batch: batch_name.to_string(),
                                                                    task: task.name().to_string(),
                                                                    error: attributed.clone() });
            return Err(attributed);
        }

        let overwrite = self.policy == ExecutionPolicy::AlwaysRerun;
        let mut output_hashes = Vec::new();
        for (key, mut artifact) in ctx.into_outputs() {
            artifact.hash = hash_value(&artifact.payload);
            output_hashes.push(artifact.hash.clone());
            self.artifact_store.commit(&execution, &key, artifact, overwrite)?;
        }

        let disc_artifact = Artifact::new_unhashed(ArtifactKind::Discriminators, json!(discriminators));
        self.artifact_store.commit(&execution, DISCRIMINATORS_KEY, disc_artifact, overwrite)?;

        self.event_store.append_kind(run_id,
                                     RunEventKind::TaskFinished { batch: batch_name.to_string(),
                                                                  task: task.name().to_string(),
                                                                  execution: execution.clone(),
                                                                  outputs: output_hashes });
        scope.insert(task.name().to_string(), execution.clone());
        push_record(records, task.name(), execution, discriminators, false);
        Ok(())
    }

    /// Liga cada import declarado a su artifact comprometido. Fuente no
    /// ejecutada o artifact no comprometido → `Dependency` con la identidad
    /// de la tarea consumidora.
    fn bind_imports(&self,
                    consumer: &str,
                    imports: &[crate::task::Import],
                    scope: &HashMap<String, String>)
                    -> Result<HashMap<String, Artifact>, LabError> {
        let mut bound = HashMap::new();
        for import in imports {
            let execution = scope.get(&import.source_task).ok_or_else(|| LabError::Dependency {
                task: consumer.to_string(),
                detail: format!("import references task `{}` which has not executed", import.source_task),
            })?;
            match self.artifact_store.load(execution, &import.source_key) {
                Lookup::Found(artifact) => {
                    bound.insert(import.alias.clone(), artifact);
                }
                Lookup::Missing => {
                    return Err(LabError::Dependency {
                        task: consumer.to_string(),
                        detail: format!("task `{}` committed no artifact under key `{}`",
                                        import.source_task, import.source_key),
                    });
                }
            }
        }
        Ok(bound)
    }

    fn resolve_space(&self,
                     batch: &Batch,
                     outer_config: &Configuration,
                     batch_imports: &HashMap<String, Artifact>)
                     -> Result<ParameterSpace, LabError> {
        match batch.space() {
            SpaceSource::Fixed(space) => Ok(space.clone()),
            SpaceSource::Derived(derive) => {
                let ctx = TaskContext::new(outer_config, batch_imports.clone(), Vec::new());
                derive(&ctx).map_err(|e| e.in_task(batch.name()))
            }
        }
    }
}

/// Una ejecución se registra una sola vez por corrida aunque varias
/// configuraciones la compartan (p. ej. una tarea sin discriminadores que
/// todos los folds reusan).
fn push_record(records: &mut Vec<TaskExecutionRecord>,
               task: &str,
               execution: String,
               discriminators: std::collections::BTreeMap<String, String>,
               reused: bool) {
    if records.iter().any(|r| r.execution == execution) {
        return;
    }
    records.push(TaskExecutionRecord { task: task.to_string(),
                                       execution,
                                       discriminators,
                                       reused });
}
