//! Narration script generation.
//!
//! Builds an episode script from a book's catalog metadata (summary,
//! themes, characters) by choosing one phrasing per section, then paces the
//! result to the requested duration assuming the engine speaks about 160
//! words per minute. Scripts longer than the word budget are truncated;
//! shorter ones are left alone, so short durations yield short episodes.

use bookcast_shared::models::Book;
use rand::seq::SliceRandom;
use rand::Rng;

/// Assumed speech rate, matching the engine default
pub const WORDS_PER_MINUTE: usize = 160;

/// Word budget implied by a requested duration
pub fn word_budget(duration_minutes: i32) -> usize {
    duration_minutes.max(1) as usize * WORDS_PER_MINUTE
}

fn pick<R: Rng>(rng: &mut R, values: &[String], fallback: &str) -> String {
    values
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

fn choose<R: Rng>(rng: &mut R, candidates: &[String]) -> String {
    candidates
        .choose(rng)
        .cloned()
        .unwrap_or_default()
}

/// Builds a narration script for one episode
pub fn build_script(book: &Book, duration_minutes: i32) -> String {
    let mut rng = rand::thread_rng();

    let theme = pick(&mut rng, &book.themes, "the human experience");
    let second_theme = pick(&mut rng, &book.themes, "moral questions");
    let character = pick(&mut rng, &book.characters, "the protagonist");

    let title = &book.title;
    let author = &book.author;

    let intro = choose(
        &mut rng,
        &[
            format!(
                "Welcome to today's episode, where we dive deep into the fascinating world of '{title}' by {author}."
            ),
            format!(
                "Hello and welcome! Join us as we unpack the themes and significance of '{title}' in this episode."
            ),
            format!(
                "Today we're exploring '{title}', {author}'s celebrated work and one of literature's enduring classics."
            ),
        ],
    );

    let overview = format!(
        "{summary} This {genre} novel from {year} explores questions that remain relevant in our modern world.",
        summary = book.summary,
        genre = book.genre.to_lowercase(),
        year = book.year,
    );

    let theme_analysis = choose(
        &mut rng,
        &[
            format!(
                "One of the central themes is the exploration of {theme}, which the author examines with remarkable depth."
            ),
            format!(
                "The novel grapples with questions of {theme}, inviting readers to reflect on their own experiences."
            ),
            format!(
                "Through its narrative, the book addresses important issues of {theme}, making it particularly thought-provoking."
            ),
        ],
    );

    let character_analysis = choose(
        &mut rng,
        &[
            format!(
                "The characters, particularly {character}, are crafted with such complexity that they feel like real people."
            ),
            format!(
                "Readers often find themselves deeply invested in characters like {character}, whose struggles mirror our own."
            ),
            format!(
                "From {character} to the supporting cast, every character contributes meaningfully to the story's impact."
            ),
        ],
    );

    let significance = format!(
        "'{title}' has earned its place in the literary canon. Its influence extends far beyond its {year} publication, \
         and its treatment of {second_theme} continues to spark discussion among readers and scholars alike.",
        year = book.year,
    );

    let educational = format!(
        "The book serves as a powerful starting point for conversations about {second_theme}, \
         which is part of why it remains a fixture in classrooms and reading groups."
    );

    let recommendation = choose(
        &mut rng,
        &[
            format!(
                "If this overview sparked your interest, the full text of '{title}' rewards a careful read."
            ),
            format!(
                "Whether you're revisiting '{title}' or meeting it for the first time, there's always more to discover."
            ),
        ],
    );

    let outro = format!(
        "That wraps up our look at '{title}' by {author}. Thanks for listening, and happy reading."
    );

    let script = [
        intro,
        overview,
        theme_analysis,
        character_analysis,
        significance,
        educational,
        recommendation,
        outro,
    ]
    .join("\n\n");

    pace(&script, word_budget(duration_minutes))
}

/// Truncates a script to at most `budget` words
pub fn pace(script: &str, budget: usize) -> String {
    let words: Vec<&str> = script.split_whitespace().collect();

    if words.len() <= budget {
        return script.to_string();
    }

    words[..budget].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_book() -> Book {
        Book {
            id: 1,
            title: "Pride and Prejudice".to_string(),
            author: "Jane Austen".to_string(),
            year: 1813,
            genre: "Romance".to_string(),
            description: "A romantic novel of manners.".to_string(),
            summary: "A classic novel exploring themes of love, reputation, and class.".to_string(),
            themes: vec!["Love".to_string(), "Social Class".to_string()],
            characters: vec!["Elizabeth Bennet".to_string(), "Mr. Darcy".to_string()],
            popularity: 98,
            rating: 4.7,
            pages: 432,
            language: "English".to_string(),
            cover_url: None,
            source: None,
        }
    }

    #[test]
    fn test_word_budget() {
        assert_eq!(word_budget(1), 160);
        assert_eq!(word_budget(5), 800);
        assert_eq!(word_budget(30), 4800);

        // Degenerate durations still yield a usable budget
        assert_eq!(word_budget(0), 160);
        assert_eq!(word_budget(-3), 160);
    }

    #[test]
    fn test_pace_leaves_short_scripts_alone() {
        let script = "one two three";
        assert_eq!(pace(script, 10), script);
        assert_eq!(pace(script, 3), script);
    }

    #[test]
    fn test_pace_truncates_to_budget() {
        let script = "one two three four five";
        let paced = pace(script, 3);
        assert_eq!(paced, "one two three");
    }

    #[test]
    fn test_script_mentions_the_book() {
        let script = build_script(&test_book(), 5);
        assert!(script.contains("Pride and Prejudice"));
        assert!(script.contains("Jane Austen"));
        assert!(script.contains("1813"));
    }

    #[test]
    fn test_script_respects_word_budget() {
        let script = build_script(&test_book(), 1);
        let words = script.split_whitespace().count();
        assert!(words <= word_budget(1), "script has {words} words");
    }

    #[test]
    fn test_script_uses_metadata_fallbacks() {
        let mut book = test_book();
        book.themes.clear();
        book.characters.clear();

        let script = build_script(&book, 5);
        assert!(script.contains("the human experience") || script.contains("moral questions"));
        assert!(script.contains("the protagonist"));
    }
}
