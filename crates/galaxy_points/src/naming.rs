//! Fanciful galaxy names, e.g. `VOLUPTAS MAGNAM VII PRIME`.

use crate::random::{RandomSource, pick_random, rand_int};

const WORDS: &[&str] = &[
    "alias", "amet", "animi", "aperiam", "aspernatur", "autem", "beatae", "blanditiis",
    "commodi", "consequatur", "corporis", "culpa", "cupiditate", "debitis", "delectus",
    "deleniti", "dicta", "dolor", "dolorem", "dolores", "ducimus", "eaque", "eius", "eligendi",
    "enim", "error", "esse", "eveniet", "excepturi", "exercitationem", "explicabo", "facere",
    "facilis", "fugiat", "fugit", "harum", "illo", "impedit", "inventore", "ipsam", "iste",
    "iusto", "labore", "laboriosam", "laudantium", "magnam", "maiores", "maxime", "minima",
    "molestiae", "mollitia", "natus", "nemo", "nesciunt", "nihil", "nobis", "nostrum",
    "numquam", "odio", "officia", "omnis", "optio", "pariatur", "perferendis", "placeat",
    "porro", "possimus", "praesentium", "provident", "quaerat", "quibusdam", "quisquam",
    "ratione", "recusandae", "reiciendis", "repellat", "repudiandae", "rerum", "saepe",
    "sapiente", "sequi", "similique", "sint", "soluta", "suscipit", "tempora", "tenetur",
    "totam", "ullam", "unde", "vel", "velit", "veniam", "veritatis", "vitae", "voluptas",
    "voluptate", "voluptatem",
];

const NUMERALS: &[&str] = &["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

// the empty decorator leaves the numeral last
const DECORATORS: &[&str] = &["Major", "Alpha", "Beta", "Omega", "", "Prime", "Bonus"];

pub const MIN_WORDS: i32 = 1;
pub const MAX_WORDS: i32 = 5;

/// One to five words, a roman numeral and an optional decorator, upper-cased.
pub fn galaxy_name<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let word_count = rand_int(MIN_WORDS, MAX_WORDS, rng);
    let mut parts: Vec<&str> = (0..word_count)
        .filter_map(|_| pick_random(WORDS, rng).copied())
        .collect();
    parts.extend(pick_random(NUMERALS, rng).copied());
    parts.extend(pick_random(DECORATORS, rng).copied().filter(|d| !d.is_empty()));
    parts.join(" ").to_uppercase()
}
