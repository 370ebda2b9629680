//! Session controller: owns the configuration, the sequence store and the
//! renderer, and runs at most one algorithm engine at a time.

use std::sync::{Arc, Mutex, MutexGuard};

use rand::{rngs::StdRng, SeedableRng};
use tokio::task::JoinHandle;

use crate::{
    config::{delay_from_speed, validate_size},
    render::{SharedRenderer, StepRenderer, Surface},
    run_algorithm, sequence, Algorithm, AppConfig, CancelToken, DelayHandle, Pacer, Result,
    SequenceStore, SortVizError, StepContext, StepEvent, StepObserver,
};

/// How a sort run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The engine finished and its result was committed to the store.
    Completed(Vec<u32>),
    /// The run was cancelled by a newer sort or generate request.
    Cancelled,
    /// The engine finished, but the sequence had been replaced meanwhile.
    Superseded,
}

/// Handle to a sort run spawned by [`Session::start_sort`].
#[derive(Debug)]
pub struct RunHandle {
    algorithm: Algorithm,
    token: CancelToken,
    task: JoinHandle<Result<RunOutcome>>,
}

impl RunHandle {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the run to end.
    pub async fn wait(self) -> Result<RunOutcome> {
        self.task
            .await
            .map_err(|err| SortVizError::msg(format!("sort task failed: {err}")))?
    }
}

pub struct Session<S> {
    config: AppConfig,
    store: Arc<Mutex<SequenceStore>>,
    renderer: SharedRenderer<S>,
    delay: DelayHandle,
    rng: StdRng,
    active: Option<CancelToken>,
}

impl<S: Surface + 'static> Session<S> {
    pub fn new(config: AppConfig, surface: S) -> Result<Self> {
        config.validate()?;
        let rng = match config.session.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let renderer = StepRenderer::with_overlay(surface, config.surface.merge_overlay);

        Ok(Self {
            delay: DelayHandle::new(config.session.delay_ms),
            store: Arc::new(Mutex::new(SequenceStore::new())),
            renderer: SharedRenderer::new(renderer),
            rng,
            active: None,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn renderer(&self) -> &SharedRenderer<S> {
        &self.renderer
    }

    pub fn algorithm(&self) -> Algorithm {
        self.config.session.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.config.session.algorithm = algorithm;
    }

    pub fn set_size(&mut self, size: usize) -> Result<()> {
        validate_size(size)?;
        self.config.session.size = size;
        Ok(())
    }

    pub fn current_delay(&self) -> u64 {
        self.delay.get()
    }

    /// Changes the step delay, including for a run that is in flight.
    pub fn set_delay(&mut self, millis: u64) {
        self.config.session.delay_ms = millis;
        self.delay.set(millis);
    }

    pub fn set_speed(&mut self, speed: u8) -> Result<()> {
        let millis = delay_from_speed(speed)?;
        self.set_delay(millis);
        Ok(())
    }

    /// Copy of the committed sequence.
    pub fn current(&self) -> Result<Vec<u32>> {
        Ok(self.lock_store()?.current().to_vec())
    }

    /// Replaces the sequence with fresh random values and draws it.
    pub fn generate(&mut self) -> Result<Vec<u32>> {
        let values = sequence::generate(
            self.config.session.size,
            &self.config.surface,
            &mut self.rng,
        )?;
        self.load(values.clone())?;
        Ok(values)
    }

    /// Regenerates the sequence; kept as its own action for the reset control.
    pub fn reset(&mut self) -> Result<Vec<u32>> {
        self.generate()
    }

    /// Replaces the sequence with `values` and draws it. Any run in flight is
    /// cancelled first.
    pub fn load(&mut self, values: Vec<u32>) -> Result<()> {
        self.cancel();
        let generation = self.lock_store()?.set(values.clone());
        tracing::info!(generation, len = values.len(), "sequence loaded");
        self.renderer.render_full(&values)
    }

    /// Cancels the run in flight, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }

    pub fn start_sort(&mut self) -> Result<RunHandle> {
        self.start_sort_with(self.algorithm())
    }

    /// Spawns `algorithm` on a working copy of the sequence. A run that is
    /// still in flight is cancelled so two runs never draw over each other.
    pub fn start_sort_with(&mut self, algorithm: Algorithm) -> Result<RunHandle> {
        self.cancel();
        let (generation, values) = self.lock_store()?.snapshot();
        let token = CancelToken::new();
        self.active = Some(token.clone());

        tracing::info!(
            %algorithm,
            len = values.len(),
            delay_ms = self.delay.get(),
            "starting sort run"
        );

        let pacer = Pacer::new(self.delay.clone(), token.clone());
        let renderer = self.renderer.clone();
        let store = Arc::clone(&self.store);
        let task = tokio::spawn(async move {
            let mut observer = RunObserver {
                renderer,
                token: pacer.token().clone(),
            };
            let (result, steps) = {
                let mut ctx = StepContext::new(&mut observer, pacer);
                let result = run_algorithm(algorithm, values, &mut ctx).await;
                (result, ctx.steps())
            };

            let finish = result.and_then(|sorted| {
                let mut renderer = observer.lock_live()?;
                if !lock(&store)?.commit(generation, sorted.clone()) {
                    return Ok(RunOutcome::Superseded);
                }
                renderer.render_full(&sorted)?;
                Ok(RunOutcome::Completed(sorted))
            });

            match finish {
                Ok(RunOutcome::Superseded) => {
                    tracing::warn!(%algorithm, steps, "sort run superseded, result discarded");
                    Ok(RunOutcome::Superseded)
                }
                Ok(outcome) => {
                    tracing::info!(%algorithm, steps, "sort run finished");
                    Ok(outcome)
                }
                Err(SortVizError::Cancelled) => {
                    tracing::info!(%algorithm, steps, "sort run cancelled");
                    Ok(RunOutcome::Cancelled)
                }
                Err(err) => Err(err),
            }
        });

        Ok(RunHandle {
            algorithm,
            token,
            task,
        })
    }

    /// Runs the selected algorithm to completion.
    pub async fn sort(&mut self) -> Result<RunOutcome> {
        self.start_sort()?.wait().await
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, SequenceStore>> {
        lock(&self.store)
    }
}

/// Renderer access for a spawned run. The token is checked while the renderer
/// lock is held, so once a run is cancelled it can no longer draw over the
/// sequence that replaced it.
struct RunObserver<S> {
    renderer: SharedRenderer<S>,
    token: CancelToken,
}

impl<S: Surface> RunObserver<S> {
    fn lock_live(&self) -> Result<MutexGuard<'_, StepRenderer<S>>> {
        let renderer = self.renderer.lock()?;
        if self.token.is_cancelled() {
            return Err(SortVizError::Cancelled);
        }
        Ok(renderer)
    }
}

impl<S: Surface> StepObserver<u32> for RunObserver<S> {
    fn on_step(&mut self, values: &[u32], event: &StepEvent<'_, u32>) -> Result<()> {
        self.lock_live()?.on_step(values, event)
    }
}

fn lock(store: &Mutex<SequenceStore>) -> Result<MutexGuard<'_, SequenceStore>> {
    store
        .lock()
        .map_err(|_| SortVizError::msg("sequence store has been poisoned"))
}

impl<S> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("delay", &self.delay)
            .field("running", &self.active.is_some())
            .finish()
    }
}
