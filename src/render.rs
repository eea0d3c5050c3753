use std::sync::OnceLock;

use minijinja::{context, Environment};

use crate::config::WidgetConfig;
use crate::error::Result;
use crate::models::PollResult;

/// Pixel constants shared by a widget's markup and its stylesheet.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub title_height: u32,
    pub title_padding_top: u32,
    pub build_number_width: u32,
    pub details_margin: u32,
}

pub const DEFAULT_LAYOUT: Layout = Layout {
    title_height: 27,
    title_padding_top: 3,
    build_number_width: 84,
    details_margin: 3,
};

const TEMPLATES: [(&str, &str); 7] = [
    ("jenkins_job.html", include_str!("templates/jenkins_job.html")),
    ("jenkins_job.css", include_str!("templates/jenkins_job.css")),
    ("travis_ci.html", include_str!("templates/travis_ci.html")),
    ("travis_ci.css", include_str!("templates/travis_ci.css")),
    ("gocd_pipeline.html", include_str!("templates/gocd_pipeline.html")),
    ("gocd_pipeline.css", include_str!("templates/gocd_pipeline.css")),
    ("widget_error.html", include_str!("templates/widget_error.html")),
];

static ENVIRONMENT: OnceLock<Environment<'static>> = OnceLock::new();

/// The template set, compiled on first use.
fn environment() -> Result<&'static Environment<'static>> {
    if let Some(env) = ENVIRONMENT.get() {
        return Ok(env);
    }
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(ENVIRONMENT.get_or_init(|| env))
}

/// Height of one build row in percent: rows share the builds area evenly.
fn row_height(count: usize) -> String {
    if count == 0 {
        return "0".to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let percent = 100.0 / count as f64 - 1.0;
    format!("{percent:.2}")
}

/// Renders a widget fragment from `<type_name>.html`.
///
/// `title` is the tooltip of the widget title bar, e.g. `"Job: my-job"`.
pub fn render_widget(
    type_name: &str,
    data: &PollResult,
    options: &WidgetConfig,
    title: &str,
    layout: &Layout,
) -> Result<String> {
    let env = environment()?;
    let template = env.get_template(&format!("{type_name}.html"))?;

    let builds_height = options
        .height()?
        .saturating_sub(layout.title_height + layout.title_padding_top);
    let details_width = options
        .width()?
        .saturating_sub(layout.build_number_width + layout.details_margin);

    let html = template.render(context! {
        name => options.name,
        title => title,
        builds => data.builds,
        builds_height => builds_height,
        details_width => details_width,
        row_height => row_height(data.builds.len()),
    })?;
    Ok(html)
}

/// Renders the stylesheet `<type_name>.css`.
pub fn render_style(type_name: &str, layout: &Layout) -> Result<String> {
    let env = environment()?;
    let template = env.get_template(&format!("{type_name}.css"))?;
    Ok(template.render(context! { layout => context! {
        title_height => layout.title_height,
        title_padding_top => layout.title_padding_top,
        build_number_width => layout.build_number_width,
    } })?)
}

/// Shown in place of a widget whose check failed.
pub fn error_fragment(widget_name: &str, error: &str) -> Result<String> {
    let env = environment()?;
    let template = env.get_template("widget_error.html")?;
    Ok(template.render(context! { name => widget_name, error => error })?)
}
