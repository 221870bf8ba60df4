use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    Plain { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ButtonElement {
    pub action_id: String,
    pub text: TextObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ButtonStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ButtonElement {
    pub fn new(action_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { action_id: action_id.into(), text: TextObject::plain(label), style: None, url: None }
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { block_id: String, text: TextObject },
    Actions { block_id: String, elements: Vec<ButtonElement> },
    Context { block_id: String, elements: Vec<TextObject> },
}

/// Who sees the reply: only the invoking user, or the whole channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseVisibility {
    #[default]
    Ephemeral,
    InChannel,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    pub visibility: ResponseVisibility,
    pub fallback_text: String,
    pub blocks: Vec<Block>,
}

pub struct MessageBuilder {
    visibility: ResponseVisibility,
    fallback_text: String,
    blocks: Vec<Block>,
}

impl MessageBuilder {
    pub fn new(fallback_text: impl Into<String>) -> Self {
        Self {
            visibility: ResponseVisibility::Ephemeral,
            fallback_text: fallback_text.into(),
            blocks: Vec::new(),
        }
    }

    pub fn in_channel(mut self) -> Self {
        self.visibility = ResponseVisibility::InChannel;
        self
    }

    pub fn section<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut SectionBuilder),
    {
        let mut builder = SectionBuilder::default();
        build(&mut builder);
        self.blocks.push(Block::Section { block_id: block_id.into(), text: builder.build() });
        self
    }

    pub fn actions<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut ActionsBuilder),
    {
        let mut builder = ActionsBuilder::default();
        build(&mut builder);
        let elements = builder.build();
        if !elements.is_empty() {
            self.blocks.push(Block::Actions { block_id: block_id.into(), elements });
        }
        self
    }

    pub fn context<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut ContextBuilder),
    {
        let mut builder = ContextBuilder::default();
        build(&mut builder);
        self.blocks.push(Block::Context { block_id: block_id.into(), elements: builder.build() });
        self
    }

    pub fn build(self) -> MessageTemplate {
        MessageTemplate {
            visibility: self.visibility,
            fallback_text: self.fallback_text,
            blocks: self.blocks,
        }
    }
}

#[derive(Default)]
pub struct SectionBuilder {
    text: Option<TextObject>,
}

impl SectionBuilder {
    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(TextObject::plain(text));
        self
    }

    pub fn mrkdwn(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(TextObject::mrkdwn(text));
        self
    }

    fn build(self) -> TextObject {
        self.text.unwrap_or_else(|| TextObject::plain(""))
    }
}

#[derive(Default)]
pub struct ActionsBuilder {
    elements: Vec<ButtonElement>,
}

impl ActionsBuilder {
    pub fn button(&mut self, button: ButtonElement) -> &mut Self {
        self.elements.push(button);
        self
    }

    fn build(self) -> Vec<ButtonElement> {
        self.elements
    }
}

#[derive(Default)]
pub struct ContextBuilder {
    elements: Vec<TextObject>,
}

impl ContextBuilder {
    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(TextObject::plain(text));
        self
    }

    pub fn mrkdwn(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(TextObject::mrkdwn(text));
        self
    }

    fn build(self) -> Vec<TextObject> {
        self.elements
    }
}

/// Longest console log tail rendered inline.
pub const LOG_TAIL_MAX_CHARS: usize = 3_000;

/// Upper bound on plugins listed in a single reply.
pub const PLUGIN_LIST_MAX: usize = 50;

pub fn help_text(trigger: &str) -> String {
    format!(
        "*Connect and disconnect with Jenkins server*\n\
         • `{t} connect username APIToken` - Connect your chat account to Jenkins.\n\
         • `{t} disconnect` - Disconnect your chat account from Jenkins.\n\
         • `{t} me` - Display the connected Jenkins account.\n\
         \n\
         *Interact with Jenkins jobs*\n\
         • `{t} build jobname [key=value ...]` - Trigger a build for the given job.\n\
         \u{2003}◦ If the job resides in a folder, specify the job as `folder1/jobname`.\n\
         \u{2003}◦ If the folder name or job name has spaces in it, wrap it in double quotes as `\"job name with space\"` or `\"folder with space/jobname\"`.\n\
         • `{t} abort jobname <build number>` - Abort the build of a given job. Without a build number the last build is aborted.\n\
         • `{t} enable jobname` - Enable a given job.\n\
         • `{t} disable jobname` - Disable a given job.\n\
         • `{t} delete jobname` - Delete a given job.\n\
         • `{t} get-artifacts jobname <build number>` - Get artifacts of a build of the given job.\n\
         • `{t} test-results jobname <build number>` - Get test results of a build of the given job.\n\
         • `{t} get-log jobname <build number>` - Get the log of a build. Without a build number the last build is used.\n\
         \n\
         *Server*\n\
         • `{t} plugins` - List the plugins installed on the Jenkins server.\n\
         • `{t} safe-restart` - Safe restart the Jenkins server.\n\
         • `{t} help` - Show this help.",
        t = trigger
    )
}

pub fn help_message(trigger: &str) -> MessageTemplate {
    MessageBuilder::new("Jenkins slash command help")
        .section("jenkins.help.summary.v1", |section| {
            section.mrkdwn(help_text(trigger));
        })
        .build()
}

pub fn unknown_command_message(verb: &str, trigger: &str) -> MessageTemplate {
    MessageBuilder::new(format!("Unknown command: {verb}"))
        .section("jenkins.help.unknown.v1", |section| {
            section.mrkdwn(format!("*Unknown command:* `{verb}`"));
        })
        .section("jenkins.help.summary.v1", |section| {
            section.mrkdwn(help_text(trigger));
        })
        .build()
}

/// Private reply to the invoking user.
pub fn notice_message(text: &str) -> MessageTemplate {
    MessageBuilder::new(text.to_owned())
        .section("jenkins.notice.v1", |section| {
            section.mrkdwn(text.to_owned());
        })
        .build()
}

/// Reply posted to the channel, used when a job or the server changed state.
pub fn announcement_message(text: &str) -> MessageTemplate {
    MessageBuilder::new(text.to_owned())
        .in_channel()
        .section("jenkins.announcement.v1", |section| {
            section.mrkdwn(text.to_owned());
        })
        .build()
}

pub fn error_message(summary: &str, correlation_id: &str) -> MessageTemplate {
    MessageBuilder::new(summary.to_owned())
        .section("jenkins.error.summary.v1", |section| {
            section.mrkdwn(format!(":warning: {summary}"));
        })
        .context("jenkins.error.context.v1", |context| {
            context.plain(format!("Correlation ID: {correlation_id}"));
        })
        .build()
}

pub fn build_queued_message(job_name: &str, queue_url: Option<&str>) -> MessageTemplate {
    MessageBuilder::new(format!("Job '{job_name}' has been queued"))
        .in_channel()
        .section("jenkins.build.queued.v1", |section| {
            section.mrkdwn(format!("Job `{job_name}` has been queued for a build."));
        })
        .actions("jenkins.build.actions.v1", |actions| {
            if let Some(url) = queue_url {
                actions.button(
                    ButtonElement::new("jenkins.build.queue.v1", "Queue item")
                        .style(ButtonStyle::Primary)
                        .url(url),
                );
            }
        })
        .build()
}

/// A parameter a job declares, with its default when Jenkins reports one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterHint {
    pub name: String,
    pub default_value: Option<String>,
    pub description: Option<String>,
}

pub fn parameters_required_message(
    job_name: &str,
    parameters: &[ParameterHint],
    trigger: &str,
) -> MessageTemplate {
    let listing = parameters
        .iter()
        .map(|parameter| {
            let mut line = format!("• `{}`", parameter.name);
            if let Some(default_value) = &parameter.default_value {
                line.push_str(&format!(" (default `{default_value}`)"));
            }
            if let Some(description) = parameter.description.as_deref().filter(|d| !d.is_empty()) {
                line.push_str(&format!(" - {description}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n");
    let example = parameters
        .iter()
        .map(|parameter| {
            // Chat text is split on whitespace, so only single-word defaults survive a rerun.
            let value = parameter
                .default_value
                .as_deref()
                .filter(|value| !value.contains(char::is_whitespace))
                .unwrap_or("value");
            format!("{}={value}", parameter.name)
        })
        .collect::<Vec<_>>()
        .join(" ");
    let job = chatci_core::quote_job_name(job_name);

    MessageBuilder::new(format!("Job '{job_name}' requires build parameters"))
        .section("jenkins.build.parameters.v1", |section| {
            section.mrkdwn(format!("Job `{job_name}` accepts these parameters:\n{listing}"));
        })
        .context("jenkins.build.parameters.example.v1", |context| {
            context.mrkdwn(format!("Run `{trigger} build {job} {example}`"));
        })
        .build()
}

pub fn artifacts_message(
    job_name: &str,
    build_label: &str,
    artifacts: &[(String, String)],
) -> MessageTemplate {
    if artifacts.is_empty() {
        return notice_message(&format!("No artifacts found for {build_label} of the job '{job_name}'."));
    }

    let listing = artifacts
        .iter()
        .map(|(file_name, url)| format!("• <{url}|{file_name}>"))
        .collect::<Vec<_>>()
        .join("\n");

    MessageBuilder::new(format!("Artifacts of {build_label} of the job '{job_name}'"))
        .section("jenkins.artifacts.list.v1", |section| {
            section.mrkdwn(format!("*Artifacts of {build_label} of `{job_name}`*\n{listing}"));
        })
        .build()
}

pub fn test_results_message(
    job_name: &str,
    build_label: &str,
    passed: u64,
    failed: u64,
    skipped: u64,
    report_url: &str,
) -> MessageTemplate {
    let summary = format!("passed: {passed}, failed: {failed}, skipped: {skipped}");
    MessageBuilder::new(format!("Test results of {build_label} of the job '{job_name}': {summary}"))
        .section("jenkins.tests.summary.v1", |section| {
            section.mrkdwn(format!("*Test results of {build_label} of `{job_name}`*\n{summary}"));
        })
        .actions("jenkins.tests.actions.v1", |actions| {
            let style = if failed > 0 { ButtonStyle::Danger } else { ButtonStyle::Primary };
            actions.button(
                ButtonElement::new("jenkins.tests.report.v1", "Test report")
                    .style(style)
                    .url(report_url),
            );
        })
        .build()
}

pub fn console_log_message(job_name: &str, build_label: &str, log: &str) -> MessageTemplate {
    let (tail, truncated) = log_tail(log, LOG_TAIL_MAX_CHARS);
    let builder = MessageBuilder::new(format!("Log of {build_label} of the job '{job_name}'"))
        .section("jenkins.log.body.v1", |section| {
            section.mrkdwn(format!("*Log of {build_label} of `{job_name}`*\n```{tail}```"));
        });

    if truncated {
        builder
            .context("jenkins.log.truncated.v1", |context| {
                context.plain(format!("Showing the last {LOG_TAIL_MAX_CHARS} characters."));
            })
            .build()
    } else {
        builder.build()
    }
}

pub fn plugins_message(plugins: &[(String, String)]) -> MessageTemplate {
    if plugins.is_empty() {
        return notice_message("No plugins are installed on the Jenkins server.");
    }

    let listing = plugins
        .iter()
        .take(PLUGIN_LIST_MAX)
        .map(|(name, version)| format!("• {name} `{version}`"))
        .collect::<Vec<_>>()
        .join("\n");

    let builder = MessageBuilder::new(format!("{} plugins installed", plugins.len()))
        .section("jenkins.plugins.list.v1", |section| {
            section.mrkdwn(format!("*Installed plugins*\n{listing}"));
        });

    if plugins.len() > PLUGIN_LIST_MAX {
        builder
            .context("jenkins.plugins.truncated.v1", |context| {
                context.plain(format!(
                    "Showing {PLUGIN_LIST_MAX} of {} plugins.",
                    plugins.len()
                ));
            })
            .build()
    } else {
        builder.build()
    }
}

/// Last `max_chars` characters of `log`, and whether anything was cut.
fn log_tail(log: &str, max_chars: usize) -> (&str, bool) {
    let total = log.chars().count();
    if total <= max_chars {
        return (log, false);
    }

    let skip = total - max_chars;
    let start = log.char_indices().nth(skip).map(|(index, _)| index).unwrap_or(log.len());
    (&log[start..], true)
}
