//! Prompt templates for profile extraction

pub const JD_SYSTEM_MESSAGE: &str = "You are an AI assistant specialized in parsing job descriptions. \
Respond ONLY with the required JSON object, containing extracted information like skills, \
experience, education, and responsibilities. No explanations.";

pub const CV_SYSTEM_MESSAGE: &str = "You are an AI assistant specialized in parsing CVs and resumes. \
Respond ONLY with the required JSON object containing extracted professional information like \
skills, experience, and education. No explanations.";

const JD_SUMMARY_TEMPLATE: &str = r#"Analyze the following job description and extract the key information into a JSON object with exactly these keys:
- "required_skills": list of must-have technical skills
- "preferred_skills": list of nice-to-have skills
- "domain_expertise": list of industry or domain knowledge areas
- "soft_skills": list of interpersonal skills
- "required_education": the minimum degree as a short string, or null
- "required_experience_years": minimum years of experience as a short string such as "3 years", or null
- "essential_requirements": list of hard requirements such as certifications or licenses
- "key_responsibilities": list of the main duties

Job Description:
---
{job_description}
---

Output the result as a valid JSON object."#;

const CV_EXTRACTION_TEMPLATE: &str = r#"Analyze the following CV text and extract professional information into a JSON object with exactly these keys:
- "name": the candidate's full name, or null
- "skills": list of technical skills
- "domain_expertise": list of industry or domain knowledge areas
- "soft_skills": list of interpersonal skills
- "certifications": list of certifications held
- "education": list of degrees, each as a short phrase such as "bachelor of science in physics"
- "total_experience_years": total years of professional experience as a number
- "recent_job_titles": the two most recent job titles, newest first
- "industry_experience": list of industries worked in

CV Text:
---
{cv_text}
---

Output the result as a valid JSON object."#;

pub fn render_job_summary(job_description: &str) -> String {
    JD_SUMMARY_TEMPLATE.replace("{job_description}", job_description)
}

pub fn render_cv_extraction(cv_text: &str) -> String {
    CV_EXTRACTION_TEMPLATE.replace("{cv_text}", cv_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_substitute_text() {
        let prompt = render_job_summary("Senior Rust developer");
        assert!(prompt.contains("Senior Rust developer"));
        assert!(!prompt.contains("{job_description}"));

        let prompt = render_cv_extraction("Jane Doe, 5 years of Go");
        assert!(prompt.contains("Jane Doe, 5 years of Go"));
        assert!(prompt.contains("\"total_experience_years\""));
    }
}
