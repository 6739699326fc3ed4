// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_latex_content(size: usize) -> String {
    let base = concat!(
        "\\section{Title}\n\nParagraph with \\emph{some} content.\n% a comment\n",
        "\\begin{itemize}\n\\item First\n\\item[b] Second \\{escaped\\}\n\\end{itemize}\n\n",
    );
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_structured_latex(sections: usize, paragraphs: usize) -> String {
    let mut content = String::from("\\documentclass[a4paper]{article}\n\\begin{document}\n");

    for section in 0..sections {
        content.push_str(&format!("\\section*{{Section {}}}\n\n", section));
        for paragraph in 0..paragraphs {
            content.push_str(&format!(
                "Paragraph {} cites \\cite{{key{}}} and uses {{grouped {{nested}} text}}.\n\n",
                paragraph, section
            ));
        }
    }

    content.push_str("\\end{document}\n");
    content
}

#[allow(dead_code)]
pub fn generate_large_document() -> String {
    generate_structured_latex(50, 8)
}
