// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DisplayPreference, TracingConfig, WriterConfig, rolling_file_appender_impl};
use miette::IntoDiagnostic;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_thread_names(true)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
    };
}

pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Install `tracing_config` as the global subscriber. Returns `Ok(false)`, and
/// installs nothing, for [`WriterConfig::None`].
///
/// # Errors
///
/// Returns an error if the log file can not be created or a global subscriber is
/// already installed.
pub fn init_tracing(tracing_config: TracingConfig) -> miette::Result<bool> {
    let Some(layers) = try_create_layers(&tracing_config)? else {
        return Ok(false);
    };
    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .into_diagnostic()?;
    Ok(true)
}

/// Install `tracing_config` for the current thread only, until the guard is dropped.
///
/// # Errors
///
/// Returns an error if the log file can not be created.
pub fn install_thread_local(
    tracing_config: TracingConfig,
) -> miette::Result<Option<tracing::subscriber::DefaultGuard>> {
    let Some(layers) = try_create_layers(&tracing_config)? else {
        return Ok(None);
    };
    Ok(Some(tracing_subscriber::registry().with(layers).set_default()))
}

/// Returns the layers without installing them, or `None` for [`WriterConfig::None`].
///
/// # Errors
///
/// Returns an error if the log file can not be created.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    let level_filter = tracing_config.get_level_filter();
    let writer_config = tracing_config.get_writer_config();
    if writer_config == WriterConfig::None {
        return Ok(None);
    }

    let mut layers: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];
    layers.push(Box::new(level_filter));
    if let Some(layer) = try_create_display_layer(level_filter, &writer_config) {
        layers.push(layer);
    }
    if let Some(layer) = try_create_file_layer(level_filter, &writer_config)? {
        layers.push(layer);
    }
    Ok(Some(layers))
}

pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> Option<Box<DynLayer<S>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();
    match writer_config {
        WriterConfig::DisplayAndFile(display_pref, _)
        | WriterConfig::Display(display_pref) => match display_pref {
            DisplayPreference::Stdout => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            )),
            DisplayPreference::Stderr => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            )),
        },
        WriterConfig::None | WriterConfig::File(_) => None,
    }
}

/// # Errors
///
/// Returns an error if the log file can not be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();
    Ok(match writer_config {
        WriterConfig::DisplayAndFile(_, file_path)
        | WriterConfig::File(file_path) => {
            let file = rolling_file_appender_impl::try_create(file_path)?;
            Some(Box::new(
                fmt_layer
                    .with_ansi(false)
                    .with_writer(file)
                    .with_filter(level_filter),
            ))
        }
        WriterConfig::None | WriterConfig::Display(_) => None,
    })
}
