use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tera::{Context, Tera};
use tracing::{debug, info};

use crate::common::validate_file_name;
use crate::config::CliConfig;
use crate::error::ScaffoldError;
use crate::installer::PackageManager;
use crate::registry::Registry;
use crate::transfer::{copy_config_files, copy_dir_all, ensure_directory, write_file};

#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub project_name: String,
    pub en_page: String,
    pub fr_page: String,
    pub eslint: bool,
    pub prettier: bool,
    pub local: bool,
    pub dir: Option<PathBuf>,
}

impl CreateOptions {
    fn packages(&self) -> Vec<&'static str> {
        [("eslint", self.eslint), ("prettier", self.prettier)]
            .into_iter()
            .filter_map(|(name, opted)| opted.then_some(name))
            .collect()
    }
}

pub async fn create_project(
    options: CreateOptions,
    config: &CliConfig,
    registry: &Registry,
    package_manager: &impl PackageManager,
) -> Result<PathBuf, ScaffoldError> {
    let project_name = options.project_name.trim().to_lowercase();
    for (field, value) in [
        ("project name", project_name.as_str()),
        ("English page name", options.en_page.as_str()),
        ("French page name", options.fr_page.as_str()),
    ] {
        validate_file_name(value).map_err(|reason| ScaffoldError::InvalidName {
            field,
            value: value.to_string(),
            reason,
        })?;
    }

    let packages = options
        .packages()
        .into_iter()
        .map(|name| {
            registry
                .lookup(name)
                .ok_or_else(|| ScaffoldError::UnknownPackage(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let pwd = std::env::current_dir().map_err(ScaffoldError::WorkingDirectory)?;
    let project_path = match &options.dir {
        Some(dir) if dir.is_relative() => pwd.join(dir),
        Some(dir) => dir.clone(),
        None => pwd.join(&project_name),
    };
    if project_path.exists() {
        return Err(ScaffoldError::ProjectExists(project_path));
    }

    info!(
        "Creating a new Ontario Frontend project in {}",
        project_path.display()
    );
    ensure_directory(&project_path)?;

    info!("Copying boilerplate files");
    let copied = copy_dir_all(&config.create_boilerplate_dir(), &project_path)?;
    debug!("{} boilerplate files copied", copied);

    let mut dev_dependencies = BTreeMap::new();
    for package in &packages {
        for dependency in &package.dependencies {
            dev_dependencies.insert(dependency.clone(), "latest".to_string());
        }
    }

    let framework_dependency = if options.local {
        format!("file:{}/", config.local_framework_dir().display())
    } else {
        "latest".to_string()
    };

    let mut context = Context::new();
    context.insert("project_name", &project_name);
    context.insert("en_page", &options.en_page);
    context.insert("fr_page", &options.fr_page);
    context.insert("eslint", &options.eslint);
    context.insert("prettier", &options.prettier);
    context.insert("framework_name", &config.framework_dependency);
    // Pre-quoted so paths with backslashes stay valid JSON.
    context.insert(
        "framework_dependency",
        &serde_json::Value::String(framework_dependency).to_string(),
    );
    context.insert("dev_dependencies", &dev_dependencies);

    info!("Generating project files");
    let tera = templates()?;
    for (template_name, file_name) in project_files(&options.en_page, &options.fr_page) {
        let content = render(&tera, template_name, &context)?;
        write_file(&project_path.join(&file_name), &content)?;
        debug!("Generated {}", file_name);
    }

    for package in &packages {
        copy_config_files(
            &config.shared_boilerplate_dir(),
            &package.config_files,
            &project_path,
        )?;
        info!("{} configuration copied", package.name);
    }

    package_manager
        .install_all(&project_path)
        .await
        .map_err(|err| ScaffoldError::Installation {
            project: project_name.clone(),
            err,
        })?;

    Ok(project_path)
}

/// (template, output path relative to the project root)
fn project_files(en_page: &str, fr_page: &str) -> Vec<(&'static str, String)> {
    vec![
        ("package.json", "package.json".to_string()),
        ("README.md", "README.md".to_string()),
        ("eleventy.js", ".eleventy.js".to_string()),
        ("en.njk", format!("src/{en_page}.njk")),
        ("index.njk", "src/index.njk".to_string()),
        ("fr.njk", format!("src/{fr_page}.njk")),
        ("sitemap.njk", "src/sitemap.njk".to_string()),
        ("globals.js", "src/_data/globals.js".to_string()),
    ]
}

fn templates() -> Result<Tera, ScaffoldError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("package.json", PACKAGE_TEMPLATE),
        ("README.md", README_TEMPLATE),
        ("eleventy.js", ELEVENTY_TEMPLATE),
        ("en.njk", EN_PAGE_TEMPLATE),
        ("index.njk", INDEX_TEMPLATE),
        ("fr.njk", FR_PAGE_TEMPLATE),
        ("sitemap.njk", SITEMAP_TEMPLATE),
        ("globals.js", GLOBALS_TEMPLATE),
    ])
    .map_err(|err| ScaffoldError::TemplateRender {
        template: "<all>".to_string(),
        err,
    })?;
    Ok(tera)
}

fn render(tera: &Tera, template: &str, context: &Context) -> Result<String, ScaffoldError> {
    tera.render(template, context)
        .map_err(|err| ScaffoldError::TemplateRender {
            template: template.to_string(),
            err,
        })
}

pub fn print_next_steps(project_path: &Path) {
    println!("New project created in {}", project_path.display());
    println!("You can run the project with `npm run serve`");
    println!("You can build the project with `npm run build`");
}

const PACKAGE_TEMPLATE: &str = r#"{
  "name": "{{ project_name }}",
  "version": "0.1.0",
  "private": true,
  "scripts": {
    "serve": "npx @11ty/eleventy --serve",
    "build": "npx @11ty/eleventy"{% if eslint %},
    "lint": "eslint ."{% endif %}{% if prettier %},
    "format": "prettier --write ."{% endif %}
  },
  "dependencies": {
    "{{ framework_name }}": {{ framework_dependency }}
  },
  "devDependencies": {
{%- for name, version in dev_dependencies %}
    "{{ name }}": "{{ version }}"{% if not loop.last %},{% endif %}
{%- endfor %}
  }
}
"#;

const README_TEMPLATE: &str = r#"# {{ project_name }}

An Ontario.ca Frontend project.

- English page: `src/{{ en_page }}.njk`
- French page: `src/{{ fr_page }}.njk`

Run `npm run serve` to start a local server and `npm run build` to build the site.
"#;

const ELEVENTY_TEMPLATE: &str = r#"const { ontariocaEleventyConfigFunc } = require('{{ framework_name }}');

module.exports = function (eleventyConfig) {
  return ontariocaEleventyConfigFunc(eleventyConfig, __dirname);
};
"#;

const EN_PAGE_TEMPLATE: &str = r#"---
layout: ontario-base.njk
lang: en
permalink: /en/{{ en_page }}/
translationKey: home
---
{% raw %}<h1>{{ "home.heading" | localeString }}</h1>{% endraw %}
"#;

const FR_PAGE_TEMPLATE: &str = r#"---
layout: ontario-base.njk
lang: fr
permalink: /fr/{{ fr_page }}/
translationKey: home
---
{% raw %}<h1>{{ "home.heading" | localeString }}</h1>{% endraw %}
"#;

const INDEX_TEMPLATE: &str = r#"---
permalink: /
---
<meta http-equiv="refresh" content="0; url=/en/{{ en_page }}/" />
"#;

const SITEMAP_TEMPLATE: &str = r#"---
permalink: /sitemap.xml
eleventyExcludeFromCollections: true
---
<?xml version="1.0" encoding="utf-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{% raw %}{%- for page in collections.all %}
  <url><loc>{{ page.url }}</loc></url>
{%- endfor %}{% endraw %}
</urlset>
"#;

const GLOBALS_TEMPLATE: &str = r#"module.exports = {
  projectName: '{{ project_name }}',
  englishPage: '{{ en_page }}',
  frenchPage: '{{ fr_page }}',
};
"#;
