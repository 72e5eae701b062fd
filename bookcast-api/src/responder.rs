/// Chat assistant responder
///
/// A keyword-matching assistant, not a language model. Replies are chosen
/// from canned templates in three tiers:
///
/// 1. A message mentioning a catalog book gets a blurb built from that
///    book's metadata plus a podcast suggestion.
/// 2. A message with podcast-related words gets pointers to the
///    generation feature.
/// 3. Everything else gets a general reply echoing the message.
///
/// Keyword checks are case-insensitive substring matches, tested in table
/// order; the first hit wins.

use bookcast_shared::models::Book;
use rand::seq::SliceRandom;
use sqlx::PgPool;

/// Lowercase keyword fragments mapped to catalog titles
const BOOK_KEYWORDS: &[(&str, &str)] = &[
    ("pride", "Pride and Prejudice"),
    ("prejudice", "Pride and Prejudice"),
    ("gatsby", "The Great Gatsby"),
    ("frankenstein", "Frankenstein"),
    ("1984", "1984"),
    ("mockingbird", "To Kill a Mockingbird"),
    ("wuthering", "Wuthering Heights"),
    ("jane eyre", "Jane Eyre"),
    ("brave new world", "Brave New World"),
    ("moby", "Moby Dick"),
    ("catcher", "The Catcher in the Rye"),
    ("hobbit", "The Hobbit"),
    ("dorian gray", "The Picture of Dorian Gray"),
];

const PODCAST_KEYWORDS: &[&str] = &["podcast", "audio", "generate", "create", "record", "listen"];

/// Finds the first catalog title whose keyword appears in the message
fn match_book_keyword(message: &str) -> Option<&'static str> {
    let message = message.to_lowercase();

    BOOK_KEYWORDS
        .iter()
        .find(|(keyword, _)| message.contains(keyword))
        .map(|(_, title)| *title)
}

/// Checks whether the message is about podcast generation
fn is_podcast_query(message: &str) -> bool {
    let message = message.to_lowercase();

    PODCAST_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword))
}

/// One-paragraph blurb built from a book's catalog metadata
fn book_blurb(book: &Book) -> String {
    let themes = if book.themes.is_empty() {
        "the human experience".to_string()
    } else {
        book.themes.join(", ")
    };

    format!(
        "'{title}' by {author} is a {genre} work that explores themes of {themes}. \
         Published in {year}, it remains relevant for its insights into society and human nature.",
        title = book.title,
        author = book.author,
        genre = book.genre.to_lowercase(),
        year = book.year,
    )
}

fn book_reply(book: &Book) -> String {
    let blurb = book_blurb(book);
    let title = &book.title;

    let replies = [
        format!(
            "I see you're asking about '{title}'. {blurb}\n\nWould you like me to help you generate a podcast episode about this book?"
        ),
        format!(
            "Ah, '{title}' is a fascinating work! {blurb}\n\nI can help you create an educational podcast about it if you're interested."
        ),
        format!(
            "That's an excellent choice! '{title}' has so much to explore. {blurb}\n\nWould you like to discuss specific themes or generate a podcast?"
        ),
        format!(
            "I'm glad you mentioned '{title}'! {blurb}\n\nThis would make a great topic for a podcast episode."
        ),
    ];

    choose(&replies)
}

fn podcast_reply() -> String {
    let replies = [
        "I can help you generate podcasts from books in our collection! Just select a book and choose 'Generate Podcast'.".to_string(),
        "To create a podcast, browse the catalog, select a book, and submit a generation request. I'll help you create an educational episode!".to_string(),
        "Podcast generation is one of my specialties! Choose any book from our collection, and I'll help you create an engaging audio episode about it.".to_string(),
        "I'd love to help you create a podcast! Browse our book collection, pick one that interests you, and use the podcast generation feature.".to_string(),
    ];

    choose(&replies)
}

fn general_reply(message: &str) -> String {
    let replies = [
        format!(
            "I understand you're asking about: '{message}'. I can help you with:\n\
             • Book recommendations and summaries\n\
             • Podcast generation from books\n\
             • Literary analysis and discussions\n\
             • Finding books by genre or author\n\n\
             What would you like to explore today?"
        ),
        format!(
            "Interesting question about: '{message}'. Have you checked our book collection? \
             I can help you find related titles or generate a podcast episode about this topic."
        ),
        format!(
            "Regarding '{message}', this relates to many classic works in our collection. \
             Would you like me to suggest some books or help you create educational content about it?"
        ),
        format!(
            "Great question! '{message}' is an excellent topic for discussion. \
             I can help you explore this through our book collection or by generating a podcast episode. \
             What specifically interests you about this topic?"
        ),
    ];

    choose(&replies)
}

fn choose(candidates: &[String]) -> String {
    candidates
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default()
}

/// Produces the assistant's reply to a user message.
///
/// A keyword hit whose book is somehow absent from the catalog degrades to
/// the general reply rather than failing the request.
pub async fn respond(pool: &PgPool, message: &str) -> Result<String, sqlx::Error> {
    if let Some(title) = match_book_keyword(message) {
        if let Some(book) = Book::find_by_title(pool, title).await? {
            return Ok(book_reply(&book));
        }
    }

    if is_podcast_query(message) {
        return Ok(podcast_reply());
    }

    Ok(general_reply(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_book() -> Book {
        Book {
            id: 4,
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
            year: 1949,
            genre: "Dystopian Fiction".to_string(),
            description: "A dystopian social science fiction novel.".to_string(),
            summary: "A chilling portrayal of totalitarianism.".to_string(),
            themes: vec!["Totalitarianism".to_string(), "Surveillance".to_string()],
            characters: vec!["Winston Smith".to_string()],
            popularity: 96,
            rating: 4.6,
            pages: 328,
            language: "English".to_string(),
            cover_url: None,
            source: None,
        }
    }

    #[test]
    fn test_book_keyword_match() {
        assert_eq!(
            match_book_keyword("Tell me about The Great Gatsby"),
            Some("The Great Gatsby")
        );
        assert_eq!(match_book_keyword("what is 1984 about?"), Some("1984"));
        assert_eq!(
            match_book_keyword("I love JANE EYRE"),
            Some("Jane Eyre"),
            "matching is case-insensitive"
        );
        assert_eq!(match_book_keyword("recommend me something"), None);
    }

    #[test]
    fn test_first_keyword_wins() {
        // Mentions two books; table order decides
        assert_eq!(
            match_book_keyword("pride and prejudice or the hobbit?"),
            Some("Pride and Prejudice")
        );
    }

    #[test]
    fn test_podcast_query_detection() {
        assert!(is_podcast_query("how do I make a podcast?"));
        assert!(is_podcast_query("can I LISTEN to this?"));
        assert!(!is_podcast_query("what books do you have?"));
    }

    #[test]
    fn test_book_reply_mentions_title_and_metadata() {
        let reply = book_reply(&test_book());
        assert!(reply.contains("1984"));
        assert!(reply.contains("George Orwell"));
        assert!(reply.contains("1949"));
    }

    #[test]
    fn test_general_reply_echoes_message() {
        let reply = general_reply("medieval poetry");
        assert!(reply.contains("medieval poetry"));
    }

    #[test]
    fn test_blurb_falls_back_without_themes() {
        let mut book = test_book();
        book.themes.clear();

        let blurb = book_blurb(&book);
        assert!(blurb.contains("the human experience"));
    }
}
