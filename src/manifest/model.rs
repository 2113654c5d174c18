use crate::animation::ease::Ease;
use crate::animation::state::StateDef;
use crate::engine::TriggerSpec;
use crate::engine::config::{
    EngineOptions, GroupConfig, RevealConfig, RevealTrigger, ScrubConfig, Target,
};
use crate::foundation::error::{UnveilError, UnveilResult};
use crate::page::accordion::AccordionConfig;
use crate::page::filter::FilterConfig;
use crate::page::header::HeaderConfig;
use crate::page::modal::ModalConfig;
use crate::page::nav::NavConfig;
use crate::page::spy::SpyConfig;
use crate::trigger::point::{EnterPoint, ScrollPoint};
use crate::trigger::region::ScrubRange;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ManifestDef {
    pub(crate) version: String,
    #[serde(default)]
    pub(crate) page_class: Option<String>,
    #[serde(default)]
    pub(crate) options: EngineOptions,
    #[serde(default)]
    pub(crate) triggers: Vec<TriggerDef>,
    #[serde(default)]
    pub(crate) header: Option<HeaderConfig>,
    #[serde(default)]
    pub(crate) spy: Option<SpyConfig>,
    #[serde(default)]
    pub(crate) nav: Option<NavConfig>,
    #[serde(default)]
    pub(crate) modals: Vec<ModalConfig>,
    #[serde(default)]
    pub(crate) accordions: Vec<AccordionConfig>,
    #[serde(default)]
    pub(crate) filter: Option<FilterConfig>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TriggerMode {
    #[default]
    Reveal,
    Group,
    Scrub,
}

/// One manifest registration. `scope` repeats it once per matching block, with `target` and
/// `trigger` looked up inside the block and the block itself as the default trigger node.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TriggerDef {
    pub(crate) target: String,
    #[serde(default)]
    pub(crate) mode: TriggerMode,
    #[serde(default)]
    pub(crate) scope: Option<String>,
    #[serde(default)]
    pub(crate) trigger: Option<String>,
    #[serde(default)]
    pub(crate) from: Option<StateDef>,
    #[serde(default)]
    pub(crate) to: Option<StateDef>,
    #[serde(default)]
    pub(crate) duration: Option<f64>,
    #[serde(default)]
    pub(crate) delay: Option<f64>,
    #[serde(default)]
    pub(crate) ease: Option<Ease>,
    #[serde(default)]
    pub(crate) start: Option<ScrollPoint>,
    #[serde(default)]
    pub(crate) end: Option<ScrollPoint>,
    #[serde(default)]
    pub(crate) on_load: bool,
    #[serde(default)]
    pub(crate) retrigger: bool,
    #[serde(default)]
    pub(crate) stagger: Option<f64>,
    #[serde(default)]
    pub(crate) smoothing: Option<f64>,
}

impl TriggerDef {
    /// Engine configuration for this entry. `anchor` is the resolved trigger node, if any.
    pub(crate) fn to_spec(&self, anchor: Option<Target>) -> UnveilResult<TriggerSpec> {
        match self.mode {
            TriggerMode::Reveal => {
                self.reject(self.stagger.is_some(), "stagger")?;
                self.reject_scrub_fields()?;
                Ok(TriggerSpec::Reveal(self.reveal_config(anchor)?))
            }
            TriggerMode::Group => {
                self.reject_scrub_fields()?;
                let stagger = self
                    .stagger
                    .ok_or_else(|| UnveilError::manifest("group triggers need a stagger"))?;
                Ok(TriggerSpec::Group(GroupConfig::new(
                    self.reveal_config(anchor)?,
                    stagger,
                )))
            }
            TriggerMode::Scrub => {
                self.reject(self.duration.is_some(), "duration")?;
                self.reject(self.delay.is_some(), "delay")?;
                self.reject(self.stagger.is_some(), "stagger")?;
                self.reject(self.on_load, "on_load")?;
                self.reject(self.retrigger, "retrigger")?;
                let (Some(from), Some(to)) = (self.from, self.to) else {
                    return Err(UnveilError::manifest("scrub triggers need both from and to"));
                };
                let mut range = ScrubRange::whole_page();
                if let Some(start) = self.start {
                    range.start = start;
                }
                if let Some(end) = self.end {
                    range.end = end;
                }
                let mut config = ScrubConfig::new(from, to, range);
                if let Some(ease) = self.ease {
                    config.ease = ease;
                }
                config.smoothing = self.smoothing;
                config.anchor = anchor;
                Ok(TriggerSpec::Scrub(config))
            }
        }
    }

    fn reveal_config(&self, anchor: Option<Target>) -> UnveilResult<RevealConfig> {
        let mut config = RevealConfig::default();
        if let Some(from) = self.from {
            config.from = from;
        }
        if let Some(to) = self.to {
            config.to = to;
        }
        if let Some(d) = self.duration {
            config.timing.duration = d;
        }
        if let Some(d) = self.delay {
            config.timing.delay = d;
        }
        if let Some(ease) = self.ease {
            config.timing.ease = ease;
        }
        config.retrigger = self.retrigger;

        config.trigger = if self.on_load {
            if self.start.is_some() || anchor.is_some() {
                return Err(UnveilError::manifest(
                    "on_load triggers take neither start nor trigger",
                ));
            }
            RevealTrigger::Load
        } else {
            let point = match self.start {
                None => EnterPoint::default(),
                Some(ScrollPoint::Edge(p)) => p,
                Some(other) => {
                    return Err(UnveilError::manifest(format!(
                        "reveal start '{other}' must be '<element> <viewport>'"
                    )));
                }
            };
            RevealTrigger::Enter { point, anchor }
        };
        Ok(config)
    }

    fn reject_scrub_fields(&self) -> UnveilResult<()> {
        self.reject(self.end.is_some(), "end")?;
        self.reject(self.smoothing.is_some(), "smoothing")
    }

    fn reject(&self, present: bool, field: &str) -> UnveilResult<()> {
        if present {
            return Err(UnveilError::manifest(format!(
                "'{field}' is not allowed on {:?} triggers",
                self.mode
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/model.rs"]
mod tests;
