//! Composite provisioning workflows: `create_vm` and `create_template`.
//!
//! Each workflow is planned as an ordered list of steps. A failing step is
//! reported with a [`StepFailed`] context carrying its index; passing that
//! index to the matching `resume_*` function re-runs the workflow from that
//! step. Nothing is rolled back.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};

use super::lifecycle::{self, DEFAULT_STOP_TIMEOUT};
use super::packages;
use super::predicates::{exists_or_fail, is_template_or_fail, not_exists_or_fail};
use crate::application::ports::{Executor, LifecycleObserver, PackageScripts};
use crate::application::services::Tracked;
use crate::domain::prefs::validate_label;
use crate::domain::validate::{validate_domain_name, validate_packages};
use crate::domain::{DomainError, Operation, Outcome, PreferenceSet, StepFailed};

/// Label given to new templates unless another is requested.
pub const DEFAULT_TEMPLATE_LABEL: &str = "black";

pub type JobFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;

/// A zero-argument unit of caller work run after a domain is provisioned.
pub type Job<'a> = Box<dyn FnOnce() -> JobFuture<'a> + 'a>;

/// Box an async closure as a [`Job`].
pub fn job<'a, F, Fut>(f: F) -> Job<'a>
where
    F: FnOnce() -> Fut + 'a,
    Fut: Future<Output = Result<()>> + 'a,
{
    Box::new(move || Box::pin(f()))
}

fn check_cursor(from: usize, steps: usize) -> Result<()> {
    if from > steps {
        return Err(DomainError::PreconditionFailed(format!(
            "cannot resume from step {from}, the workflow has {steps} steps"
        ))
        .into());
    }
    Ok(())
}

// ── create_vm ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmStep {
    Clone,
    Create,
    SetPreferences,
    EnableServices,
    /// Caller job, by position in the job list.
    Job(usize),
}

impl fmt::Display for VmStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clone => f.write_str("clone"),
            Self::Create => f.write_str("create"),
            Self::SetPreferences => f.write_str("set preferences"),
            Self::EnableServices => f.write_str("enable services"),
            Self::Job(n) => write!(f, "job {n}"),
        }
    }
}

/// Everything `create_vm` needs. Built with [`VmRequest::new`] and the
/// chainable setters.
pub struct VmRequest<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub clone_from: Option<&'a str>,
    pub prefs: Option<PreferenceSet>,
    pub services: Vec<&'a str>,
    pub jobs: Vec<Job<'a>>,
    /// Only consulted when creating fresh; a clone target must not exist.
    pub exists_ok: bool,
}

impl<'a> VmRequest<'a> {
    #[must_use]
    pub fn new(name: &'a str, label: &'a str) -> Self {
        Self {
            name,
            label,
            clone_from: None,
            prefs: None,
            services: Vec::new(),
            jobs: Vec::new(),
            exists_ok: true,
        }
    }

    #[must_use]
    pub fn clone_from(mut self, source: &'a str) -> Self {
        self.clone_from = Some(source);
        self
    }

    #[must_use]
    pub fn prefs(mut self, prefs: PreferenceSet) -> Self {
        self.prefs = Some(prefs);
        self
    }

    #[must_use]
    pub fn services(mut self, services: &[&'a str]) -> Self {
        self.services.extend_from_slice(services);
        self
    }

    #[must_use]
    pub fn job(mut self, job: Job<'a>) -> Self {
        self.jobs.push(job);
        self
    }

    #[must_use]
    pub fn exists_ok(mut self, exists_ok: bool) -> Self {
        self.exists_ok = exists_ok;
        self
    }

    /// Steps this request runs, in order.
    ///
    /// A clone always sets preferences, since the label has to be applied;
    /// a fresh domain gets the label from `qvm-create` and only applies
    /// preferences that were given.
    #[must_use]
    pub fn plan(&self) -> Vec<VmStep> {
        let mut steps = Vec::new();
        if self.clone_from.is_some() {
            steps.extend([VmStep::Clone, VmStep::SetPreferences]);
        } else {
            steps.push(VmStep::Create);
            if self.prefs.is_some() {
                steps.push(VmStep::SetPreferences);
            }
        }
        if !self.services.is_empty() {
            steps.push(VmStep::EnableServices);
        }
        steps.extend((0..self.jobs.len()).map(VmStep::Job));
        steps
    }
}

/// Create (or clone) a domain, configure it and run the caller's jobs.
///
/// # Errors
///
/// Precondition errors are returned as is, before any step. A failing step
/// is wrapped in `StepFailed`.
pub async fn create_vm(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    request: VmRequest<'_>,
) -> Result<Outcome> {
    resume_vm(exec, observer, request, 0).await
}

/// Run `request` starting at step `from`. Preconditions are only checked
/// when starting from the first step.
///
/// # Errors
///
/// See [`create_vm`]; also `PreconditionFailed` for a cursor past the end.
pub async fn resume_vm(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    request: VmRequest<'_>,
    from: usize,
) -> Result<Outcome> {
    let name = request.name;
    let op = Tracked::begin(observer, Operation::CreateVm, name);
    let result = run_vm(exec, observer, request, from).await;
    op.finish(result)
}

async fn run_vm(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    request: VmRequest<'_>,
    from: usize,
) -> Result<Outcome> {
    let steps = request.plan();
    check_cursor(from, steps.len())?;
    validate_domain_name(request.name)?;
    validate_label(request.label)?;
    let prefs = match request.clone_from {
        Some(_) => Some(PreferenceSet::with_label(request.prefs.as_ref(), request.label)?),
        None => request.prefs,
    };
    if from == 0 {
        if let Some(source) = request.clone_from {
            exists_or_fail(exec, source).await?;
            not_exists_or_fail(exec, request.name).await?;
        } else if !request.exists_ok {
            not_exists_or_fail(exec, request.name).await?;
        }
    }

    let mut jobs = request.jobs.into_iter();
    for (index, step) in steps.into_iter().enumerate() {
        // jobs are consumed in order so skipped ones are dropped unrun
        let job = match step {
            VmStep::Job(_) => jobs.next(),
            _ => None,
        };
        if index < from {
            continue;
        }
        let result = match step {
            VmStep::Clone => match request.clone_from {
                Some(source) => lifecycle::clone(exec, observer, source, request.name)
                    .await
                    .map(drop),
                None => Ok(()),
            },
            VmStep::Create => lifecycle::create(
                exec,
                observer,
                request.name,
                request.label,
                &[],
                request.exists_ok,
            )
            .await
            .map(drop),
            VmStep::SetPreferences => match &prefs {
                Some(prefs) => lifecycle::set_preferences(exec, observer, request.name, prefs)
                    .await
                    .map(drop),
                None => Ok(()),
            },
            VmStep::EnableServices => {
                lifecycle::enable_services(exec, observer, request.name, &request.services)
                    .await
                    .map(drop)
            }
            VmStep::Job(_) => match job {
                Some(job) => job().await,
                None => Ok(()),
            },
        };
        result.with_context(|| StepFailed {
            index,
            step: step.to_string(),
        })?;
    }
    Ok(Outcome::Applied)
}

// ── create_template ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateStep {
    Clone,
    SetPreferences,
    Update,
    Install,
    Stop,
}

impl fmt::Display for TemplateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Clone => "clone",
            Self::SetPreferences => "set preferences",
            Self::Update => "update",
            Self::Install => "install packages",
            Self::Stop => "stop",
        })
    }
}

/// A new template cloned from an existing one.
///
/// End state: after `update` or a non-empty `packages` the relay has
/// started the template, so it is left running unless `shutdown` is set.
/// With `shutdown` it ends stopped. With neither it stays stopped as cloned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRequest<'a> {
    pub target: &'a str,
    pub source: &'a str,
    pub label: &'a str,
    /// Extra preferences; the label is always applied on top.
    pub prefs: Option<PreferenceSet>,
    pub update: bool,
    pub packages: Vec<&'a str>,
    pub shutdown: bool,
}

impl<'a> TemplateRequest<'a> {
    #[must_use]
    pub fn new(target: &'a str, source: &'a str) -> Self {
        Self {
            target,
            source,
            label: DEFAULT_TEMPLATE_LABEL,
            prefs: None,
            update: false,
            packages: Vec::new(),
            shutdown: false,
        }
    }

    #[must_use]
    pub fn plan(&self) -> Vec<TemplateStep> {
        let mut steps = vec![TemplateStep::Clone, TemplateStep::SetPreferences];
        if self.update {
            steps.push(TemplateStep::Update);
        }
        if !self.packages.is_empty() {
            steps.push(TemplateStep::Install);
        }
        if self.shutdown {
            steps.push(TemplateStep::Stop);
        }
        steps
    }
}

/// Clone a template from `request.source` and prepare it.
///
/// # Errors
///
/// `IsNotTemplate`/`DoesNotExist` for the source or `AlreadyExists` for
/// the target, before any step. A failing step is wrapped in `StepFailed`.
pub async fn create_template(
    exec: &impl Executor,
    scripts: &impl PackageScripts,
    observer: &impl LifecycleObserver,
    request: &TemplateRequest<'_>,
) -> Result<Outcome> {
    resume_template(exec, scripts, observer, request, 0).await
}

/// Run the template workflow starting at step `from`. Preconditions are
/// only checked when starting from the first step.
///
/// # Errors
///
/// See [`create_template`]; also `PreconditionFailed` for a cursor past
/// the end.
pub async fn resume_template(
    exec: &impl Executor,
    scripts: &impl PackageScripts,
    observer: &impl LifecycleObserver,
    request: &TemplateRequest<'_>,
    from: usize,
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::CreateTemplate, request.target);
    let result = run_template(exec, scripts, observer, request, from).await;
    op.finish(result)
}

async fn run_template(
    exec: &impl Executor,
    scripts: &impl PackageScripts,
    observer: &impl LifecycleObserver,
    request: &TemplateRequest<'_>,
    from: usize,
) -> Result<Outcome> {
    let steps = request.plan();
    check_cursor(from, steps.len())?;
    validate_domain_name(request.target)?;
    let prefs = PreferenceSet::with_label(request.prefs.as_ref(), request.label)?;
    if !request.packages.is_empty() {
        validate_packages(&request.packages)?;
    }
    if from == 0 {
        is_template_or_fail(exec, request.source).await?;
        not_exists_or_fail(exec, request.target).await?;
    }

    for (index, step) in steps.into_iter().enumerate().skip(from) {
        let target = request.target;
        let result = match step {
            TemplateStep::Clone => lifecycle::clone(exec, observer, request.source, target).await,
            TemplateStep::SetPreferences => {
                lifecycle::set_preferences(exec, observer, target, &prefs).await
            }
            TemplateStep::Update => packages::update(exec, scripts, observer, target).await,
            TemplateStep::Install => {
                packages::install(exec, scripts, observer, target, &request.packages).await
            }
            TemplateStep::Stop => {
                lifecycle::stop(exec, observer, target, DEFAULT_STOP_TIMEOUT).await
            }
        };
        result.with_context(|| StepFailed {
            index,
            step: step.to_string(),
        })?;
    }
    Ok(Outcome::Applied)
}
