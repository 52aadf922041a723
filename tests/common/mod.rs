#![allow(dead_code)]

use cine_voice::{
    models::RawMovie,
    services::{
        catalog::Catalog,
        recommendations::{Recommender, RecommenderSettings},
        rules::RuleSet,
    },
};

pub fn movie(
    title: &str,
    genres: &str,
    actors: &str,
    director: &str,
    year: &str,
    plot: &str,
    mood: &str,
    rating: &str,
) -> RawMovie {
    RawMovie {
        title: Some(title.to_string()),
        genres: Some(genres.to_string()),
        actors: Some(actors.to_string()),
        director: Some(director.to_string()),
        year: Some(year.to_string()),
        plot: Some(plot.to_string()),
        mood: Some(mood.to_string()),
        rating: Some(rating.to_string()),
    }
}

/// Small catalog covering every filterable field
pub fn catalog() -> Catalog {
    Catalog::from_raw(vec![
        movie(
            "Spotlight",
            "Drama, Crime",
            "Michael Keaton, Mark Ruffalo, Rachel McAdams",
            "Tom McCarthy",
            "2015",
            "journalists uncover abuse hidden by a powerful institution",
            "tense",
            "8.1",
        ),
        movie(
            "Inception",
            "Sci-Fi, Action",
            "Leonardo DiCaprio, Elliot Page",
            "Christopher Nolan",
            "2010",
            "a thief who steals secrets through dream sharing plans one last heist",
            "exciting",
            "8.8",
        ),
        movie(
            "Titanic",
            "Romance, Drama",
            "Leonardo DiCaprio, Kate Winslet",
            "James Cameron",
            "1997",
            "a young couple falls in love aboard a doomed ship",
            "romantic",
            "7.9",
        ),
        movie(
            "The Hangover",
            "Comedy",
            "Bradley Cooper, Ed Helms",
            "Todd Phillips",
            "2009",
            "three friends wake up in vegas with no memory of the night before",
            "comedy",
            "7.7",
        ),
        movie(
            "Shutter Island",
            "Thriller, Mystery",
            "Leonardo DiCaprio, Mark Ruffalo",
            "Martin Scorsese",
            "2010",
            "a marshal investigates a disappearance at an island hospital",
            "dark",
            "8.2",
        ),
        movie(
            "Coco",
            "Animation, Family",
            "Anthony Gonzalez",
            "Lee Unkrich",
            "2017",
            "a boy who dreams of music travels to the land of the dead",
            "inspiring",
            "8.4",
        ),
    ])
}

pub fn recommender_with(catalog: Catalog, settings: RecommenderSettings) -> Recommender {
    Recommender::new(catalog, RuleSet::builtin().unwrap(), settings)
}

pub fn recommender() -> Recommender {
    recommender_with(catalog(), RecommenderSettings::default())
}
