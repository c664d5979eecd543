/// Pick the shading environment to load.
///
/// The level's own choice wins. Otherwise the first candidate the host can
/// load wins. If none can, the first candidate is used anyway and the host
/// gets to report the missing resource.
pub fn resolve_shading_environment<F>(
    level_choice: Option<String>,
    candidates: &[String],
    can_get: F,
) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    if let Some(name) = level_choice.filter(|n| !n.is_empty()) {
        return Some(name);
    }

    tracing::warn!("no shading environment set in level, applying default");
    if let Some(found) = candidates.iter().find(|c| can_get(c.as_str())) {
        return Some(found.clone());
    }

    let first = candidates.first()?;
    tracing::warn!(candidate = %first, "no default shading environment is loadable");
    Some(first.clone())
}
