mod knowledge;
mod persistence;

pub use knowledge::KnowledgeBase;
pub use persistence::{
    load_dining_halls, load_knowledge_base, load_knowledge_base_or_discard, load_meal_list,
    load_or_create_dining_halls, load_visits, load_visits_if_present, parse_knowledge_base,
    parse_menu_items, read_menu_items, sample_dining_halls, save_dining_hall_records,
    save_dining_hall_stats, save_hall_averages, save_knowledge_base, save_scored_meals,
    KnowledgeMetadata,
};
