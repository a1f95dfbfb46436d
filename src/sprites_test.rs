use super::*;

#[test]
fn first_request_starts_load() {
    let mut cache: SpriteCache<u32> = SpriteCache::new();
    assert!(cache.request(ComponentType::Track));
    assert_eq!(cache.state(ComponentType::Track), Some(&SpriteState::Loading));
}

#[test]
fn repeated_request_does_not_restart() {
    let mut cache: SpriteCache<u32> = SpriteCache::new();
    assert!(cache.request(ComponentType::Track));
    assert!(!cache.request(ComponentType::Track));
}

#[test]
fn loading_sprite_is_not_drawable() {
    let mut cache: SpriteCache<u32> = SpriteCache::new();
    cache.request(ComponentType::Spotlight);
    assert!(cache.get(ComponentType::Spotlight).is_none());
}

#[test]
fn resolved_sprite_is_returned() {
    let mut cache: SpriteCache<u32> = SpriteCache::new();
    cache.request(ComponentType::Spotlight);
    cache.resolve(ComponentType::Spotlight, 7);
    assert_eq!(cache.get(ComponentType::Spotlight), Some(&7));
}

#[test]
fn failed_sprite_is_not_retried() {
    let mut cache: SpriteCache<u32> = SpriteCache::new();
    cache.request(ComponentType::Connector);
    cache.fail(ComponentType::Connector);
    assert!(cache.get(ComponentType::Connector).is_none());
    assert!(!cache.request(ComponentType::Connector));
    assert_eq!(cache.state(ComponentType::Connector), Some(&SpriteState::Failed));
}

#[test]
fn types_are_independent() {
    let mut cache: SpriteCache<u32> = SpriteCache::new();
    cache.request(ComponentType::Track);
    cache.resolve(ComponentType::Track, 1);
    assert!(cache.get(ComponentType::Bundle).is_none());
    assert!(cache.state(ComponentType::Bundle).is_none());
}
