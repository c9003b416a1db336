use super::*;

#[test]
fn settings_path_ends_with_app_dir() {
    let path = settings_path();
    assert!(path.ends_with("nrgrip/settings.toml"));
}

#[test]
fn empty_document_is_all_defaults() {
    let settings = Settings::from_toml("").unwrap();
    assert_eq!(settings, Settings::default());

    let effective = settings.resolve(&Overrides::default());
    assert_eq!(effective.format, OutputFormat::Wav);
    assert!(effective.cue);
    assert!(!effective.include_pregap);
    assert!(!effective.checksum);
    assert_eq!(effective.session_mode_check, SessionModeCheck::NewerFormatOnly);
    assert_eq!(effective.output_dir, None);
}

#[test]
fn parses_every_key() {
    let settings = Settings::from_toml(
        r#"
[extract]
format = "aiff"
output_dir = "/rips"
include_pregap = true
cue = false
checksum = true

[parse]
session_mode_check = "always"
"#,
    )
    .unwrap();
    assert_eq!(settings.extract.format, Some(OutputFormat::Aiff));
    assert_eq!(settings.extract.output_dir, Some(PathBuf::from("/rips")));
    assert_eq!(settings.extract.cue, Some(false));
    assert_eq!(
        settings.parse.session_mode_check,
        Some(SessionModeCheck::Always)
    );
}

#[test]
fn cli_overrides_file_values() {
    let settings = Settings::from_toml("[extract]\nformat = \"raw\"\ncue = false\n").unwrap();
    let cli = Overrides {
        format: Some(OutputFormat::Aiff),
        session_mode_check: Some(SessionModeCheck::Never),
        ..Default::default()
    };
    let effective = settings.resolve(&cli);
    assert_eq!(effective.format, OutputFormat::Aiff);
    // Not given on the CLI, so the file wins
    assert!(!effective.cue);
    assert_eq!(effective.parse_options().session_mode_check, SessionModeCheck::Never);
}

#[test]
fn bad_values_are_settings_errors() {
    assert!(matches!(
        Settings::from_toml("[extract]\nformat = \"flac\"\n"),
        Err(ExtractError::Settings(_))
    ));
    assert!(matches!(
        Settings::from_toml("[parse]\nsession_mode_check = 3\n"),
        Err(ExtractError::Settings(_))
    ));
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.toml")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn output_dir_defaults_next_to_image() {
    let effective = Settings::default().resolve(&Overrides::default());
    let image = Path::new("/media/discs/album.nrg");
    assert_eq!(
        effective.output_dir_for(image),
        PathBuf::from("/media/discs/album")
    );
    assert_eq!(effective.extract_options(image).base_name, "album");

    let pinned = Settings::default().resolve(&Overrides {
        output_dir: Some(PathBuf::from("/rips")),
        ..Default::default()
    });
    assert_eq!(pinned.output_dir_for(image), PathBuf::from("/rips"));
}

#[test]
fn effective_settings_render_as_toml() {
    let text = Settings::default()
        .resolve(&Overrides::default())
        .to_toml()
        .unwrap();
    assert!(text.contains("format = \"wav\""));
    assert!(text.contains("session_mode_check = \"newer-format-only\""));
    assert!(!text.contains("output_dir"));
}
