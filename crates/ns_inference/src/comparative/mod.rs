use ns_core::{Article, ComparativeReport, Comparison, Error, Result, Sentiment};

/// Builds the comparative report over scored articles: the sentiment tally,
/// one coverage difference per adjacent pair and the union of all topics.
///
/// Every article must already carry a sentiment.
pub fn aggregate(articles: &[Article]) -> Result<ComparativeReport> {
    let mut report = ComparativeReport::default();

    for article in articles {
        report.sentiment_distribution.record(sentiment_of(article)?);
        report
            .topic_overlap
            .common_topics
            .extend(article.topics.iter().cloned());
    }

    for (i, pair) in articles.windows(2).enumerate() {
        report.comparisons.push(compare(i + 1, &pair[0], &pair[1])?);
    }

    Ok(report)
}

fn sentiment_of(article: &Article) -> Result<Sentiment> {
    article
        .sentiment
        .ok_or_else(|| Error::Inference(format!("Article was not scored: {}", article.url)))
}

/// `position` is the 1-based index of `left`.
fn compare(position: usize, left: &Article, right: &Article) -> Result<Comparison> {
    let next = position + 1;
    Ok(Comparison {
        comparison: format!(
            "Article {} ({}) vs Article {} ({})",
            position,
            sentiment_of(left)?,
            next,
            sentiment_of(right)?
        ),
        impact: format!(
            "Article {} focuses on {}, while Article {} highlights {}.",
            position,
            left.topics.join(", "),
            next,
            right.topics.join(", ")
        ),
    })
}
